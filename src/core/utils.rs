use crate::core::error::CodecError;
use bytes::{Buf, Bytes, BytesMut};

pub(crate) trait ByteLen {
    fn byte_len(&self) -> usize;
}

pub(crate) trait PacketID {
    const PACKET_ID: u8;
}

pub(crate) trait SizedPacket {
    fn packet_len(&self) -> usize;
}

pub(crate) trait Encode {
    fn encode(&self, buf: &mut BytesMut);
}

pub(crate) trait TryDecode
where
    Self: Sized,
{
    fn try_decode(bytes: Bytes) -> Result<Self, CodecError>;
}

pub(crate) struct Decoder {
    bytes: Bytes,
}

impl From<Bytes> for Decoder {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl Decoder {
    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn try_decode<T>(&mut self) -> Result<T, CodecError>
    where
        T: TryDecode + ByteLen,
    {
        let result = T::try_decode(self.bytes.clone())?;
        self.bytes.advance(result.byte_len());
        Ok(result)
    }

    /// Hands out the not-yet-decoded tail, leaving the decoder empty.
    pub(crate) fn take_remaining(&mut self) -> Bytes {
        self.bytes.split_off(0)
    }
}

pub(crate) struct Encoder<'a> {
    buf: &'a mut BytesMut,
}

impl<'a> From<&'a mut BytesMut> for Encoder<'a> {
    fn from(buf: &'a mut BytesMut) -> Self {
        Self { buf }
    }
}

impl<'a> Encoder<'a> {
    pub(crate) fn encode<T>(&mut self, val: &T)
    where
        T: Encode,
    {
        val.encode(self.buf);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    mod decoder {
        use super::*;

        #[test]
        fn try_decode() {
            const INPUT: [u8; 3] = [0x01, 0x02, 0x03];

            let mut decoder = Decoder::from(Bytes::from_static(&INPUT));

            assert_eq!(decoder.try_decode::<u8>().unwrap(), 0x01);
            assert_eq!(decoder.try_decode::<u16>().unwrap(), 0x0203);
            assert_eq!(decoder.remaining(), 0);
        }

        #[test]
        fn try_decode_out_of_bounds() {
            const INPUT: [u8; 1] = [0x01];

            let mut decoder = Decoder::from(Bytes::from_static(&INPUT));
            assert!(decoder.try_decode::<u16>().is_err());
        }

        #[test]
        fn take_remaining() {
            const INPUT: [u8; 4] = [0x01, 0x02, 0x03, 0x04];

            let mut decoder = Decoder::from(Bytes::from_static(&INPUT));
            decoder.try_decode::<u8>().unwrap();

            assert_eq!(decoder.take_remaining(), Bytes::from_static(&INPUT[1..]));
            assert_eq!(decoder.remaining(), 0);
        }
    }

    mod encoder {
        use super::*;

        #[test]
        fn encode() {
            let mut buf = BytesMut::new();
            let mut encoder = Encoder::from(&mut buf);

            encoder.encode(&0x01u8);
            encoder.encode(&0x0203u16);

            assert_eq!(&buf[..], &[0x01, 0x02, 0x03]);
        }
    }
}
