use crate::core::utils::{Encoder, PacketID, SizedPacket};
use bytes::BytesMut;
use core::mem;

/// PINGREQ packet, the keep-alive heartbeat. Fixed header only.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Pingreq;

impl Pingreq {
    const FIXED_HDR: u8 = Self::PACKET_ID << 4;

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let mut encoder = Encoder::from(buf);

        encoder.encode(&Self::FIXED_HDR);
        encoder.encode(&0u8);
    }
}

impl PacketID for Pingreq {
    const PACKET_ID: u8 = 12;
}

impl SizedPacket for Pingreq {
    fn packet_len(&self) -> usize {
        2 * mem::size_of::<u8>()
    }
}
