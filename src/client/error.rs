use crate::core::error::CodecError;
use crate::io::PacketStreamError;
use core::fmt;
use std::{error::Error, io};

/// `connect` was called while a connection is already held.
#[derive(Debug, Clone, Copy)]
pub struct AlreadyConnected;

impl fmt::Display for AlreadyConnected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "the client has already connected to the broker")
    }
}

impl Error for AlreadyConnected {}

/// An operation that requires a live connection was called without one.
#[derive(Debug, Clone, Copy)]
pub struct NotYetConnected;

impl fmt::Display for NotYetConnected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "the client has not yet connected to the broker")
    }
}

impl Error for NotYetConnected {}

/// The first packet received after CONNECT was not a CONNACK.
#[derive(Debug, Clone, Copy)]
pub struct NotConnack;

impl fmt::Display for NotConnack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a packet other than CONNACK has been received first")
    }
}

impl Error for NotConnack {}

/// No CONNACK arrived within the configured acknowledgement timeout.
#[derive(Debug, Clone, Copy)]
pub struct ConnackTimeout;

impl fmt::Display for ConnackTimeout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "timeout occurred while waiting for the CONNACK packet from the broker"
        )
    }
}

impl Error for ConnackTimeout {}

/// A second failure occurred while tearing down after an earlier error.
/// Neither error masks the other; both are carried.
#[derive(Debug)]
pub struct TeardownError {
    handling: Box<ClientError>,
    original: Box<ClientError>,
}

impl TeardownError {
    pub(crate) fn new(handling: ClientError, original: ClientError) -> Self {
        Self {
            handling: Box::new(handling),
            original: Box::new(original),
        }
    }

    /// The failure encountered during teardown itself.
    pub fn handling(&self) -> &ClientError {
        &self.handling
    }

    /// The error that triggered the teardown.
    pub fn original(&self) -> &ClientError {
        &self.original
    }
}

impl fmt::Display for TeardownError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "error \"{}\" occurred while handling the error \"{}\"",
            self.handling, self.original
        )
    }
}

impl Error for TeardownError {}

/// Main client error type. Synchronous operations return it directly;
/// failures observed by the background loops arrive through the error
/// notification channel.
#[derive(Debug)]
pub enum ClientError {
    /// See [AlreadyConnected].
    AlreadyConnected(AlreadyConnected),

    /// See [NotYetConnected].
    NotYetConnected(NotYetConnected),

    /// See [NotConnack].
    NotConnack(NotConnack),

    /// See [ConnackTimeout].
    ConnackTimeout(ConnackTimeout),

    /// Failure of the underlying transport, propagated verbatim.
    Transport(io::Error),

    /// Protocol framing failure. Connection-fatal when raised by the
    /// receive path: the stream cannot be resynchronized byte-for-byte.
    Codec(CodecError),

    /// See [TeardownError].
    Teardown(TeardownError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AlreadyConnected(err) => write!(f, "{}", err),
            Self::NotYetConnected(err) => write!(f, "{}", err),
            Self::NotConnack(err) => write!(f, "{}", err),
            Self::ConnackTimeout(err) => write!(f, "{}", err),
            Self::Transport(err) => write!(f, "{}", err),
            Self::Codec(err) => write!(f, "{}", err),
            Self::Teardown(err) => write!(f, "{}", err),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Teardown(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AlreadyConnected> for ClientError {
    fn from(err: AlreadyConnected) -> Self {
        Self::AlreadyConnected(err)
    }
}

impl From<NotYetConnected> for ClientError {
    fn from(err: NotYetConnected) -> Self {
        Self::NotYetConnected(err)
    }
}

impl From<NotConnack> for ClientError {
    fn from(err: NotConnack) -> Self {
        Self::NotConnack(err)
    }
}

impl From<ConnackTimeout> for ClientError {
    fn from(err: ConnackTimeout) -> Self {
        Self::ConnackTimeout(err)
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<CodecError> for ClientError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<TeardownError> for ClientError {
    fn from(err: TeardownError) -> Self {
        Self::Teardown(err)
    }
}

impl From<PacketStreamError> for ClientError {
    fn from(err: PacketStreamError) -> Self {
        match err {
            PacketStreamError::Io(err) => Self::Transport(err),
            PacketStreamError::Codec(err) => Self::Codec(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn teardown_reports_both_errors() {
        let original = ClientError::from(ConnackTimeout);
        let handling = ClientError::Transport(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "broken pipe",
        ));

        let composed = ClientError::from(TeardownError::new(handling, original));

        let text = composed.to_string();
        assert!(text.contains("broken pipe"));
        assert!(text.contains("CONNACK"));
    }
}
