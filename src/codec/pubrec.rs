use crate::codec::{ack, header::FixedHeader};
use crate::core::{
    error::CodecError,
    utils::{PacketID, SizedPacket},
};
use bytes::{Bytes, BytesMut};
use core::mem;

/// PUBREC packet, the first acknowledgement step of a QoS 2 PUBLISH.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Pubrec {
    pub(crate) packet_identifier: u16,
}

impl Pubrec {
    const FIXED_HDR: u8 = Self::PACKET_ID << 4;

    /// Creates a PUBREC for the given packet identifier.
    pub fn new(packet_identifier: u16) -> Self {
        Self { packet_identifier }
    }

    /// Packet identifier of the received PUBLISH.
    pub fn packet_identifier(&self) -> u16 {
        self.packet_identifier
    }

    pub(crate) fn try_decode(header: &FixedHeader, remaining: Bytes) -> Result<Self, CodecError> {
        ack::try_decode(header, remaining).map(|packet_identifier| Self { packet_identifier })
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        ack::encode(Self::FIXED_HDR, self.packet_identifier, buf);
    }
}

impl PacketID for Pubrec {
    const PACKET_ID: u8 = 5;
}

impl SizedPacket for Pubrec {
    fn packet_len(&self) -> usize {
        2 * mem::size_of::<u8>() + ack::ACK_REMAINING_LEN
    }
}
