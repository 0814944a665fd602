mod connection;
mod dial;
mod packet_stream;

pub use dial::{Dialer, TcpDialer};

pub(crate) use connection::Connection;
pub(crate) use packet_stream::PacketStreamError;
