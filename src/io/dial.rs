use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Transport collaborator: establishes the bidirectional, ordered,
/// reliable byte stream the client runs on.
///
/// The client issues exactly one dial per connect call, identified by a
/// (network kind, address) pair such as `("tcp", "host:port")`. Everything
/// below the byte stream — sockets, TLS, in-memory pipes — stays behind
/// this trait.
#[async_trait]
pub trait Dialer: Send + Sync + 'static {
    /// Byte stream produced by a successful dial.
    type Stream: AsyncRead + AsyncWrite + Send + Unpin + 'static;

    /// Establishes a connected stream to the given address.
    async fn dial(&self, network: &str, address: &str) -> io::Result<Self::Stream>;
}

/// Plain TCP transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self, network: &str, address: &str) -> io::Result<TcpStream> {
        if network != "tcp" {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported network kind: {}", network),
            ));
        }

        TcpStream::connect(address).await
    }
}
