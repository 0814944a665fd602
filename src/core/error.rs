use core::fmt;
use std::error::Error;

/// The 4-bit packet type read from the fixed header does not name any
/// known MQTT control packet.
#[derive(Debug, Clone, Copy)]
pub struct InvalidPacketType;

impl fmt::Display for InvalidPacketType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid MQTT control packet type")
    }
}

impl Error for InvalidPacketType {}

/// The packet type is a valid MQTT control packet type, but no codec is
/// registered for it on this side of the connection.
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedPacketType;

impl fmt::Display for UnsupportedPacketType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unsupported MQTT control packet type")
    }
}

impl Error for UnsupportedPacketType {}

/// Reserved flag bits in the fixed header are set for a packet type that
/// requires them to be zero.
#[derive(Debug, Clone, Copy)]
pub struct InvalidFixedHeader;

impl fmt::Display for InvalidFixedHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid fixed header")
    }
}

impl Error for InvalidFixedHeader {}

/// The declared remaining length violates the packet type's fixed contract.
#[derive(Debug, Clone, Copy)]
pub struct InvalidRemainingLength;

impl fmt::Display for InvalidRemainingLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid remaining length")
    }
}

impl Error for InvalidRemainingLength {}

/// The variable header byte slice disagrees with the length the packet
/// type requires.
#[derive(Debug, Clone, Copy)]
pub struct InvalidVariableHeaderLen;

impl fmt::Display for InvalidVariableHeaderLen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid variable header length")
    }
}

impl Error for InvalidVariableHeaderLen {}

/// The remaining-length varint is malformed: a fourth continuation byte
/// still has its top bit set, or the encoded value is out of range.
#[derive(Debug, Clone, Copy)]
pub struct MalformedLength;

impl fmt::Display for MalformedLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "malformed remaining length")
    }
}

impl Error for MalformedLength {}

/// A field holds a value outside its domain (QoS above 2, unknown connect
/// return code, non-UTF-8 string data, and the like).
#[derive(Debug, Clone, Copy)]
pub struct InvalidValue;

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid value")
    }
}

impl Error for InvalidValue {}

/// A mandatory field was left unset when building a packet or options.
#[derive(Debug, Clone, Copy)]
pub struct MandatoryFieldMissing;

impl fmt::Display for MandatoryFieldMissing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "mandatory field missing")
    }
}

impl Error for MandatoryFieldMissing {}

/// Errors produced while encoding or decoding MQTT control packets.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy)]
pub enum CodecError {
    InvalidPacketType(InvalidPacketType),
    UnsupportedPacketType(UnsupportedPacketType),
    InvalidFixedHeader(InvalidFixedHeader),
    InvalidRemainingLength(InvalidRemainingLength),
    InvalidVariableHeaderLen(InvalidVariableHeaderLen),
    MalformedLength(MalformedLength),
    InvalidValue(InvalidValue),
    MandatoryFieldMissing(MandatoryFieldMissing),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidPacketType(err) => write!(f, "{}", err),
            Self::UnsupportedPacketType(err) => write!(f, "{}", err),
            Self::InvalidFixedHeader(err) => write!(f, "{}", err),
            Self::InvalidRemainingLength(err) => write!(f, "{}", err),
            Self::InvalidVariableHeaderLen(err) => write!(f, "{}", err),
            Self::MalformedLength(err) => write!(f, "{}", err),
            Self::InvalidValue(err) => write!(f, "{}", err),
            Self::MandatoryFieldMissing(err) => write!(f, "{}", err),
        }
    }
}

impl Error for CodecError {}

impl From<InvalidPacketType> for CodecError {
    fn from(err: InvalidPacketType) -> Self {
        Self::InvalidPacketType(err)
    }
}

impl From<UnsupportedPacketType> for CodecError {
    fn from(err: UnsupportedPacketType) -> Self {
        Self::UnsupportedPacketType(err)
    }
}

impl From<InvalidFixedHeader> for CodecError {
    fn from(err: InvalidFixedHeader) -> Self {
        Self::InvalidFixedHeader(err)
    }
}

impl From<InvalidRemainingLength> for CodecError {
    fn from(err: InvalidRemainingLength) -> Self {
        Self::InvalidRemainingLength(err)
    }
}

impl From<InvalidVariableHeaderLen> for CodecError {
    fn from(err: InvalidVariableHeaderLen) -> Self {
        Self::InvalidVariableHeaderLen(err)
    }
}

impl From<MalformedLength> for CodecError {
    fn from(err: MalformedLength) -> Self {
        Self::MalformedLength(err)
    }
}

impl From<InvalidValue> for CodecError {
    fn from(err: InvalidValue) -> Self {
        Self::InvalidValue(err)
    }
}

impl From<MandatoryFieldMissing> for CodecError {
    fn from(err: MandatoryFieldMissing) -> Self {
        Self::MandatoryFieldMissing(err)
    }
}

impl From<derive_builder::UninitializedFieldError> for CodecError {
    fn from(_: derive_builder::UninitializedFieldError) -> Self {
        Self::MandatoryFieldMissing(MandatoryFieldMissing)
    }
}
