use crate::codec::header::FixedHeader;
use crate::core::{
    error::{CodecError, InvalidFixedHeader, InvalidRemainingLength, InvalidValue,
            InvalidVariableHeaderLen},
    utils::{Decoder, PacketID},
};
use bytes::Bytes;

/// Return code of the CONNACK packet.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ConnectReturnCode {
    Accepted = 0x00,
    UnacceptableProtocolVersion = 0x01,
    IdentifierRejected = 0x02,
    ServerUnavailable = 0x03,
    BadUserNameOrPassword = 0x04,
    NotAuthorized = 0x05,
}

impl TryFrom<u8> for ConnectReturnCode {
    type Error = CodecError;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0x00 => Ok(ConnectReturnCode::Accepted),
            0x01 => Ok(ConnectReturnCode::UnacceptableProtocolVersion),
            0x02 => Ok(ConnectReturnCode::IdentifierRejected),
            0x03 => Ok(ConnectReturnCode::ServerUnavailable),
            0x04 => Ok(ConnectReturnCode::BadUserNameOrPassword),
            0x05 => Ok(ConnectReturnCode::NotAuthorized),
            _ => Err(InvalidValue.into()),
        }
    }
}

/// CONNACK packet, the broker's reply to CONNECT.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Connack {
    pub(crate) session_present: bool,
    pub(crate) return_code: ConnectReturnCode,
}

impl Connack {
    const VARIABLE_HDR_LEN: usize = 2;

    /// Whether the broker resumed a stored session for this client.
    pub fn session_present(&self) -> bool {
        self.session_present
    }

    /// The broker's verdict on the connection request.
    pub fn return_code(&self) -> ConnectReturnCode {
        self.return_code
    }

    pub(crate) fn try_decode(header: &FixedHeader, remaining: Bytes) -> Result<Self, CodecError> {
        if header.flags() != 0 {
            return Err(InvalidFixedHeader.into());
        }

        if header.remaining_len() as usize != Self::VARIABLE_HDR_LEN {
            return Err(InvalidRemainingLength.into());
        }

        let mut decoder = Decoder::from(remaining);

        if decoder.remaining() != Self::VARIABLE_HDR_LEN {
            return Err(InvalidVariableHeaderLen.into());
        }

        let session_present = decoder.try_decode::<bool>()?;
        let return_code = ConnectReturnCode::try_from(decoder.try_decode::<u8>()?)?;

        Ok(Self {
            session_present,
            return_code,
        })
    }
}

impl PacketID for Connack {
    const PACKET_ID: u8 = 2;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::base_types::VarSizeInt;

    fn header(type_and_flags: u8, remaining_len: usize) -> FixedHeader {
        FixedHeader::new(type_and_flags, VarSizeInt::try_from(remaining_len).unwrap())
    }

    #[test]
    fn from_bytes_0() {
        const REMAINING: [u8; 2] = [0x01, 0x00];

        let result =
            Connack::try_decode(&header(0x20, 2), Bytes::from_static(&REMAINING)).unwrap();

        assert!(result.session_present());
        assert_eq!(result.return_code(), ConnectReturnCode::Accepted);
    }

    #[test]
    fn from_bytes_1() {
        const REMAINING: [u8; 2] = [0x00, 0x05];

        let result =
            Connack::try_decode(&header(0x20, 2), Bytes::from_static(&REMAINING)).unwrap();

        assert!(!result.session_present());
        assert_eq!(result.return_code(), ConnectReturnCode::NotAuthorized);
    }

    #[test]
    fn from_bytes_invalid_remaining_length() {
        const REMAINING: [u8; 3] = [0x00, 0x00, 0x00];

        let result = Connack::try_decode(&header(0x20, 3), Bytes::from_static(&REMAINING));

        assert!(matches!(
            result,
            Err(CodecError::InvalidRemainingLength(_))
        ));
    }

    #[test]
    fn from_bytes_reserved_flags() {
        const REMAINING: [u8; 2] = [0x00, 0x00];

        let result = Connack::try_decode(&header(0x21, 2), Bytes::from_static(&REMAINING));

        assert!(matches!(result, Err(CodecError::InvalidFixedHeader(_))));
    }

    #[test]
    fn from_bytes_short_variable_header() {
        const REMAINING: [u8; 1] = [0x00];

        let result = Connack::try_decode(&header(0x20, 2), Bytes::from_static(&REMAINING));

        assert!(matches!(
            result,
            Err(CodecError::InvalidVariableHeaderLen(_))
        ));
    }

    #[test]
    fn from_bytes_unknown_return_code() {
        const REMAINING: [u8; 2] = [0x00, 0x06];

        let result = Connack::try_decode(&header(0x20, 2), Bytes::from_static(&REMAINING));

        assert!(matches!(result, Err(CodecError::InvalidValue(_))));
    }
}
