use crate::core::{
    base_types::{Binary, QoS, UTF8String, UTF8StringRef, VarSizeInt},
    error::{CodecError, InvalidValue},
    utils::{ByteLen, Encoder, PacketID, SizedPacket},
};
use bytes::BytesMut;
use core::mem;
use derive_builder::Builder;

/// CONNECT packet, the first packet sent by the client after the network
/// connection is established.
///
/// The packet codec carries no policy: defaults for clean session and
/// keep alive are applied by the connect options layer before the packet
/// is built.
#[derive(Builder, Clone, PartialEq, Debug)]
#[builder(build_fn(error = "CodecError", validate = "Self::validate"))]
pub struct Connect {
    #[builder(setter(into))]
    pub(crate) client_identifier: UTF8String,
    #[builder(default)]
    pub(crate) clean_session: bool,
    #[builder(default)]
    pub(crate) keep_alive: u16,

    #[builder(setter(strip_option, into), default)]
    pub(crate) will_topic: Option<UTF8String>,
    #[builder(setter(strip_option, into), default)]
    pub(crate) will_message: Option<UTF8String>,
    #[builder(default)]
    pub(crate) will_qos: QoS,
    #[builder(default)]
    pub(crate) will_retain: bool,

    #[builder(setter(strip_option, into), default)]
    pub(crate) username: Option<UTF8String>,
    #[builder(setter(strip_option, into), default)]
    pub(crate) password: Option<Binary>,
}

impl ConnectBuilder {
    fn validate(&self) -> Result<(), CodecError> {
        let will_topic = self.will_topic.as_ref().and_then(Option::as_deref);
        let will_message = self.will_message.as_ref().and_then(Option::as_ref);

        // A will message is all-or-nothing and requires a non-empty topic.
        if will_message.is_some() != will_topic.is_some() {
            return Err(InvalidValue.into());
        }

        if matches!(will_topic, Some(topic) if topic.is_empty()) {
            return Err(InvalidValue.into());
        }

        if self.password.as_ref().and_then(Option::as_ref).is_some()
            && self.username.as_ref().and_then(Option::as_ref).is_none()
        {
            return Err(InvalidValue.into());
        }

        Ok(())
    }
}

impl Connect {
    const FIXED_HDR: u8 = Self::PACKET_ID << 4;
    const PROTOCOL_NAME: UTF8StringRef<'static> = "MQTT";
    const PROTOCOL_LEVEL: u8 = 4;

    fn will_flag(&self) -> bool {
        self.will_topic.is_some()
    }

    fn connect_flags(&self) -> u8 {
        let will = self.will_flag();

        // The will QoS and retain bits are only meaningful with a will.
        (u8::from(self.username.is_some()) << 7)
            | (u8::from(self.password.is_some()) << 6)
            | (u8::from(self.will_retain && will) << 5)
            | (if will { (self.will_qos as u8) << 3 } else { 0 })
            | (u8::from(will) << 2)
            | (u8::from(self.clean_session) << 1)
    }

    fn remaining_len(&self) -> usize {
        const CONNECT_FLAGS_LEN: usize = mem::size_of::<u8>();

        Self::PROTOCOL_NAME.byte_len()
            + Self::PROTOCOL_LEVEL.byte_len()
            + CONNECT_FLAGS_LEN
            + self.keep_alive.byte_len()
            + self.client_identifier.byte_len()
            + self.will_topic.as_ref().map(ByteLen::byte_len).unwrap_or(0)
            + self
                .will_message
                .as_ref()
                .map(ByteLen::byte_len)
                .unwrap_or(0)
            + self.username.as_ref().map(ByteLen::byte_len).unwrap_or(0)
            + self.password.as_ref().map(ByteLen::byte_len).unwrap_or(0)
    }

    pub(crate) fn try_encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let remaining_len = VarSizeInt::try_from(self.remaining_len())?;
        let mut encoder = Encoder::from(buf);

        encoder.encode(&Self::FIXED_HDR);
        encoder.encode(&remaining_len);

        encoder.encode(&Self::PROTOCOL_NAME);
        encoder.encode(&Self::PROTOCOL_LEVEL);
        encoder.encode(&self.connect_flags());
        encoder.encode(&self.keep_alive);

        encoder.encode(&self.client_identifier);

        if let Some(val) = self.will_topic.as_ref() {
            encoder.encode(val);
        }

        if let Some(val) = self.will_message.as_ref() {
            encoder.encode(val);
        }

        if let Some(val) = self.username.as_ref() {
            encoder.encode(val);
        }

        if let Some(val) = self.password.as_ref() {
            encoder.encode(val);
        }

        Ok(())
    }
}

impl PacketID for Connect {
    const PACKET_ID: u8 = 1;
}

impl SizedPacket for Connect {
    fn packet_len(&self) -> usize {
        let remaining_len = self.remaining_len();
        mem::size_of_val(&Self::FIXED_HDR)
            + VarSizeInt::try_from(remaining_len).map(|val| val.len()).unwrap_or(0)
            + remaining_len
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::QoS;

    #[test]
    fn to_bytes_0() {
        const EXPECTED: [u8; 21] = [
            Connect::FIXED_HDR,
            19,
            0,
            4,
            b'M',
            b'Q',
            b'T',
            b'T',
            Connect::PROTOCOL_LEVEL,
            0b0000_0010, // clean session
            0,
            60,
            0,
            7,
            b't',
            b'e',
            b's',
            b't',
            b'1',
            b'2',
            b'3',
        ];

        let mut builder = ConnectBuilder::default();
        builder.client_identifier("test123");
        builder.clean_session(true);
        builder.keep_alive(60);
        let packet = builder.build().unwrap();

        let mut buf = BytesMut::new();
        packet.try_encode(&mut buf).unwrap();

        assert_eq!(&buf[..], &EXPECTED[..]);
        assert_eq!(packet.packet_len(), EXPECTED.len());
    }

    #[test]
    fn to_bytes_1() {
        const EXPECTED: [u8; 38] = [
            Connect::FIXED_HDR,
            36,
            0,
            4,
            b'M',
            b'Q',
            b'T',
            b'T',
            Connect::PROTOCOL_LEVEL,
            0b1110_1110, // username, password, will retain, will QoS 1, will, clean session
            0,
            10,
            0,
            1,
            b'a',
            0,
            3,
            b'w',
            b'/',
            b't',
            0,
            4,
            b'g',
            b'o',
            b'n',
            b'e',
            0,
            4,
            b'u',
            b's',
            b'e',
            b'r',
            0,
            4,
            b'p',
            b'a',
            b's',
            b's',
        ];

        let mut builder = ConnectBuilder::default();
        builder.client_identifier("a");
        builder.clean_session(true);
        builder.keep_alive(10);
        builder.will_topic("w/t");
        builder.will_message("gone");
        builder.will_qos(QoS::AtLeastOnce);
        builder.will_retain(true);
        builder.username("user");
        builder.password(Binary::from_static(b"pass"));
        let packet = builder.build().unwrap();

        let mut buf = BytesMut::new();
        packet.try_encode(&mut buf).unwrap();

        assert_eq!(&buf[..], &EXPECTED[..]);
    }

    #[test]
    fn will_message_requires_topic() {
        let mut builder = ConnectBuilder::default();
        builder.client_identifier("test");
        builder.will_message("gone");

        assert!(builder.build().is_err());
    }

    #[test]
    fn will_topic_must_not_be_empty() {
        let mut builder = ConnectBuilder::default();
        builder.client_identifier("test");
        builder.will_topic("");
        builder.will_message("gone");

        assert!(builder.build().is_err());
    }

    #[test]
    fn password_requires_username() {
        let mut builder = ConnectBuilder::default();
        builder.client_identifier("test");
        builder.password(Binary::from_static(b"pass"));

        assert!(builder.build().is_err());
    }

    #[test]
    fn client_identifier_is_mandatory() {
        let builder = ConnectBuilder::default();
        assert!(builder.build().is_err());
    }
}
