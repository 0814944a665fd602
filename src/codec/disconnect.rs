use crate::core::utils::{Encoder, PacketID, SizedPacket};
use bytes::BytesMut;
use core::mem;

/// DISCONNECT packet, the client's final packet before closing the
/// connection. Fixed header only.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Disconnect;

impl Disconnect {
    const FIXED_HDR: u8 = Self::PACKET_ID << 4;

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        let mut encoder = Encoder::from(buf);

        encoder.encode(&Self::FIXED_HDR);
        encoder.encode(&0u8);
    }
}

impl PacketID for Disconnect {
    const PACKET_ID: u8 = 14;
}

impl SizedPacket for Disconnect {
    fn packet_len(&self) -> usize {
        2 * mem::size_of::<u8>()
    }
}
