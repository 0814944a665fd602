use crate::codec::header::FixedHeader;
use crate::core::{
    error::{CodecError, InvalidFixedHeader, InvalidRemainingLength, InvalidVariableHeaderLen},
    utils::PacketID,
};
use bytes::Bytes;

/// PINGRESP packet, the broker's reply to PINGREQ. Fixed header only.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Pingresp;

impl Pingresp {
    pub(crate) fn try_decode(header: &FixedHeader, remaining: Bytes) -> Result<Self, CodecError> {
        if header.flags() != 0 {
            return Err(InvalidFixedHeader.into());
        }

        if header.remaining_len() != 0 {
            return Err(InvalidRemainingLength.into());
        }

        if !remaining.is_empty() {
            return Err(InvalidVariableHeaderLen.into());
        }

        Ok(Self)
    }
}

impl PacketID for Pingresp {
    const PACKET_ID: u8 = 13;
}
