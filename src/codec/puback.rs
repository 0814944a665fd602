use crate::codec::{ack, header::FixedHeader};
use crate::core::{
    error::CodecError,
    utils::{PacketID, SizedPacket},
};
use bytes::{Bytes, BytesMut};
use core::mem;

/// PUBACK packet, the acknowledgement of a QoS 1 PUBLISH.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Puback {
    pub(crate) packet_identifier: u16,
}

impl Puback {
    const FIXED_HDR: u8 = Self::PACKET_ID << 4;

    /// Creates a PUBACK for the given packet identifier.
    pub fn new(packet_identifier: u16) -> Self {
        Self { packet_identifier }
    }

    /// Packet identifier of the acknowledged PUBLISH.
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

impl PacketID for Puback {
    const PACKET_ID: u8 = 4;
}

impl SizedPacket for Puback {
    fn packet_len(&self) -> usize {
        2 * mem::size_of::<u8>() + ack::ACK_REMAINING_LEN
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::base_types::VarSizeInt;

    #[test]
    fn from_bytes_0() {
        const REMAINING: [u8; 2] = [0x12, 0x34];

        let header = FixedHeader::new(0x40, VarSizeInt::try_from(2usize).unwrap());
        let result = Puback::try_decode(&header, Bytes::from_static(&REMAINING)).unwrap();

        assert_eq!(result.packet_identifier(), 0x1234);
    }

    #[test]
    fn to_bytes_0() {
        const EXPECTED: [u8; 4] = [0x40, 0x02, 0x12, 0x34];

        let mut buf = BytesMut::new();
        Puback::new(0x1234).encode(&mut buf);

        assert_eq!(&buf[..], &EXPECTED[..]);
    }
}
