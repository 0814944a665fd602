use crate::codec::header::FixedHeader;
use crate::core::{
    base_types::{QoS, UTF8String, VarSizeInt},
    error::{CodecError, InvalidValue, InvalidVariableHeaderLen},
    utils::{ByteLen, Decoder, Encoder, PacketID, SizedPacket},
};
use bytes::{BufMut, Bytes, BytesMut};
use core::mem;
use derive_builder::Builder;

/// PUBLISH packet, carrying an application message in either direction.
///
/// The DUP, QoS and retain flags live in the lower nibble of the fixed
/// header byte; a packet identifier is present exactly when QoS is above 0.
#[derive(Builder, Clone, PartialEq, Debug)]
#[builder(build_fn(error = "CodecError", validate = "Self::validate"))]
pub struct Publish {
    #[builder(setter(into))]
    pub(crate) topic_name: UTF8String,
    #[builder(default)]
    pub(crate) dup: bool,
    #[builder(default)]
    pub(crate) qos: QoS,
    #[builder(default)]
    pub(crate) retain: bool,
    #[builder(setter(strip_option), default)]
    pub(crate) packet_identifier: Option<u16>,
    #[builder(setter(into), default)]
    pub(crate) payload: Bytes,
}

impl PublishBuilder {
    fn validate(&self) -> Result<(), CodecError> {
        let qos = self.qos.unwrap_or_default();
        let has_identifier = self
            .packet_identifier
            .as_ref()
            .and_then(Option::as_ref)
            .is_some();

        // A packet identifier accompanies QoS 1 and 2, never QoS 0.
        if (qos == QoS::AtMostOnce) == !has_identifier {
            Ok(())
        } else {
            Err(InvalidValue.into())
        }
    }
}

impl Publish {
    /// Topic name the message is published to.
    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    /// Whether this packet is a re-delivery.
    pub fn dup(&self) -> bool {
        self.dup
    }

    /// Quality of service of the message.
    pub fn qos(&self) -> QoS {
        self.qos
    }

    /// Whether the broker is asked to retain the message.
    pub fn retain(&self) -> bool {
        self.retain
    }

    /// Packet identifier, present for QoS 1 and 2.
    pub fn packet_identifier(&self) -> Option<u16> {
        self.packet_identifier
    }

    /// Application message payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn fixed_hdr(&self) -> u8 {
        (Self::PACKET_ID << 4)
            | (u8::from(self.dup) << 3)
            | ((self.qos as u8) << 1)
            | u8::from(self.retain)
    }

    fn remaining_len(&self) -> usize {
        self.topic_name.byte_len()
            + self
                .packet_identifier
                .as_ref()
                .map(ByteLen::byte_len)
                .unwrap_or(0)
            + self.payload.len()
    }

    pub(crate) fn try_encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let remaining_len = VarSizeInt::try_from(self.remaining_len())?;
        let mut encoder = Encoder::from(&mut *buf);

        encoder.encode(&self.fixed_hdr());
        encoder.encode(&remaining_len);
        encoder.encode(&self.topic_name);

        if let Some(val) = self.packet_identifier {
            encoder.encode(&val);
        }

        buf.put_slice(&self.payload);

        Ok(())
    }

    pub(crate) fn try_decode(header: &FixedHeader, remaining: Bytes) -> Result<Self, CodecError> {
        if remaining.len() != header.remaining_len() as usize {
            return Err(InvalidVariableHeaderLen.into());
        }

        let flags = header.flags();
        let dup = flags & 0x08 != 0;
        let qos = QoS::try_from((flags >> 1) & 0x03)?;
        let retain = flags & 0x01 != 0;

        let mut decoder = Decoder::from(remaining);

        let topic_name = decoder.try_decode::<UTF8String>()?;
        let packet_identifier = if qos == QoS::AtMostOnce {
            None
        } else {
            Some(decoder.try_decode::<u16>()?)
        };
        let payload = decoder.take_remaining();

        Ok(Self {
            topic_name,
            dup,
            qos,
            retain,
            packet_identifier,
            payload,
        })
    }
}

impl PacketID for Publish {
    const PACKET_ID: u8 = 3;
}

impl SizedPacket for Publish {
    fn packet_len(&self) -> usize {
        let remaining_len = self.remaining_len();
        mem::size_of::<u8>()
            + VarSizeInt::try_from(remaining_len).map(|val| val.len()).unwrap_or(0)
            + remaining_len
    }
}
