use crate::core::{
    base_types::VarSizeInt,
    error::{CodecError, InvalidPacketType},
};

/// The 4-bit control packet type carried in the upper nibble of the first
/// fixed header byte.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PacketType {
    Connect = 1,
    Connack = 2,
    Publish = 3,
    Puback = 4,
    Pubrec = 5,
    Pubrel = 6,
    Pubcomp = 7,
    Subscribe = 8,
    Suback = 9,
    Unsubscribe = 10,
    Unsuback = 11,
    Pingreq = 12,
    Pingresp = 13,
    Disconnect = 14,
}

impl TryFrom<u8> for PacketType {
    type Error = CodecError;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            1 => Ok(PacketType::Connect),
            2 => Ok(PacketType::Connack),
            3 => Ok(PacketType::Publish),
            4 => Ok(PacketType::Puback),
            5 => Ok(PacketType::Pubrec),
            6 => Ok(PacketType::Pubrel),
            7 => Ok(PacketType::Pubcomp),
            8 => Ok(PacketType::Subscribe),
            9 => Ok(PacketType::Suback),
            10 => Ok(PacketType::Unsubscribe),
            11 => Ok(PacketType::Unsuback),
            12 => Ok(PacketType::Pingreq),
            13 => Ok(PacketType::Pingresp),
            14 => Ok(PacketType::Disconnect),
            _ => Err(InvalidPacketType.into()),
        }
    }
}

/// Fixed header of a control packet: the raw type-and-flags byte plus the
/// decoded remaining length.
///
/// Validation of the flag bits and of the remaining length is deferred to
/// the codec of the packet type named by the upper nibble, which re-checks
/// the constraints specific to that type.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct FixedHeader {
    type_and_flags: u8,
    remaining_len: VarSizeInt,
}

impl FixedHeader {
    pub(crate) fn new(type_and_flags: u8, remaining_len: VarSizeInt) -> Self {
        Self {
            type_and_flags,
            remaining_len,
        }
    }

    pub(crate) fn packet_type(&self) -> Result<PacketType, CodecError> {
        PacketType::try_from(self.type_and_flags >> 4)
    }

    pub(crate) fn flags(&self) -> u8 {
        self.type_and_flags & 0x0f
    }

    pub(crate) fn remaining_len(&self) -> u32 {
        self.remaining_len.value()
    }
}
