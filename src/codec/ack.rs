//! Shared codec for the acknowledgement packets whose whole variable
//! header is a single 16-bit packet identifier (PUBACK, PUBREC and, when
//! they are added, PUBREL and PUBCOMP).

use crate::codec::header::FixedHeader;
use crate::core::{
    error::{CodecError, InvalidFixedHeader, InvalidRemainingLength, InvalidVariableHeaderLen},
    utils::{Encoder, TryDecode},
};
use bytes::{Bytes, BytesMut};

pub(crate) const ACK_REMAINING_LEN: usize = 2;

pub(crate) fn try_decode(header: &FixedHeader, remaining: Bytes) -> Result<u16, CodecError> {
    if header.flags() != 0 {
        return Err(InvalidFixedHeader.into());
    }

    if header.remaining_len() as usize != ACK_REMAINING_LEN {
        return Err(InvalidRemainingLength.into());
    }

    if remaining.len() != ACK_REMAINING_LEN {
        return Err(InvalidVariableHeaderLen.into());
    }

    u16::try_decode(remaining)
}

pub(crate) fn encode(fixed_hdr: u8, packet_identifier: u16, buf: &mut BytesMut) {
    let mut encoder = Encoder::from(buf);

    encoder.encode(&fixed_hdr);
    encoder.encode(&(ACK_REMAINING_LEN as u8));
    encoder.encode(&packet_identifier);
}
