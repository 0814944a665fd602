use crate::codec::{
    connack::Connack, connect::Connect, disconnect::Disconnect, header::FixedHeader,
    header::PacketType, pingreq::Pingreq, pingresp::Pingresp, puback::Puback, publish::Publish,
    pubrec::Pubrec,
};
use crate::core::error::{CodecError, UnsupportedPacketType};
use bytes::{Bytes, BytesMut};

/// Control packets the client sends to the broker.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum TxPacket {
    Connect(Connect),
    Publish(Publish),
    Puback(Puback),
    Pubrec(Pubrec),
    Pingreq(Pingreq),
    Disconnect(Disconnect),
}

impl TxPacket {
    /// The 4-bit control packet type tag of this packet.
    pub fn packet_type(&self) -> PacketType {
        match self {
            TxPacket::Connect(_) => PacketType::Connect,
            TxPacket::Publish(_) => PacketType::Publish,
            TxPacket::Puback(_) => PacketType::Puback,
            TxPacket::Pubrec(_) => PacketType::Pubrec,
            TxPacket::Pingreq(_) => PacketType::Pingreq,
            TxPacket::Disconnect(_) => PacketType::Disconnect,
        }
    }

    pub(crate) fn try_encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            TxPacket::Connect(packet) => packet.try_encode(buf),
            TxPacket::Publish(packet) => packet.try_encode(buf),
            TxPacket::Puback(packet) => {
                packet.encode(buf);
                Ok(())
            }
            TxPacket::Pubrec(packet) => {
                packet.encode(buf);
                Ok(())
            }
            TxPacket::Pingreq(packet) => {
                packet.encode(buf);
                Ok(())
            }
            TxPacket::Disconnect(packet) => {
                packet.encode(buf);
                Ok(())
            }
        }
    }
}

/// Control packets the client receives from the broker.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum RxPacket {
    Connack(Connack),
    Publish(Publish),
    Puback(Puback),
    Pubrec(Pubrec),
    Pingresp(Pingresp),
}

impl RxPacket {
    /// The 4-bit control packet type tag of this packet.
    pub fn packet_type(&self) -> PacketType {
        match self {
            RxPacket::Connack(_) => PacketType::Connack,
            RxPacket::Publish(_) => PacketType::Publish,
            RxPacket::Puback(_) => PacketType::Puback,
            RxPacket::Pubrec(_) => PacketType::Pubrec,
            RxPacket::Pingresp(_) => PacketType::Pingresp,
        }
    }

    /// Decodes the variable header and payload handed over by the framing
    /// layer, dispatching on the packet type named in the fixed header.
    ///
    /// The slice must hold exactly the number of bytes the fixed header
    /// declares; a codec never reads past that boundary.
    pub(crate) fn try_decode(header: &FixedHeader, remaining: Bytes) -> Result<Self, CodecError> {
        match header.packet_type()? {
            PacketType::Connack => Connack::try_decode(header, remaining).map(RxPacket::Connack),
            PacketType::Publish => Publish::try_decode(header, remaining).map(RxPacket::Publish),
            PacketType::Puback => Puback::try_decode(header, remaining).map(RxPacket::Puback),
            PacketType::Pubrec => Pubrec::try_decode(header, remaining).map(RxPacket::Pubrec),
            PacketType::Pingresp => {
                Pingresp::try_decode(header, remaining).map(RxPacket::Pingresp)
            }
            _ => Err(UnsupportedPacketType.into()),
        }
    }
}
