use crate::core::{
    error::{CodecError, InvalidValue, InvalidVariableHeaderLen, MalformedLength},
    utils::{ByteLen, Encode, TryDecode},
};
use bytes::{BufMut, Bytes, BytesMut};
use core::mem;

/// Variable-length integer used for the remaining-length field of the
/// fixed header. Base-128, least significant group first, continuation
/// bit 0x80, at most 4 bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) struct VarSizeInt(u32);

impl VarSizeInt {
    pub(crate) const MAX: u32 = 0x0fff_ffff;

    pub(crate) fn value(&self) -> u32 {
        self.0
    }

    pub(crate) fn len(&self) -> usize {
        match self.0 {
            0..=0x7f => 1,
            0x80..=0x3fff => 2,
            0x4000..=0x1f_ffff => 3,
            _ => 4,
        }
    }
}

impl TryFrom<usize> for VarSizeInt {
    type Error = CodecError;

    fn try_from(val: usize) -> Result<Self, Self::Error> {
        if val > Self::MAX as usize {
            return Err(MalformedLength.into());
        }

        Ok(Self(val as u32))
    }
}

impl From<VarSizeInt> for u32 {
    fn from(val: VarSizeInt) -> Self {
        val.0
    }
}

impl From<VarSizeInt> for usize {
    fn from(val: VarSizeInt) -> Self {
        val.0 as usize
    }
}

impl ByteLen for VarSizeInt {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Encode for VarSizeInt {
    fn encode(&self, buf: &mut BytesMut) {
        let mut val = self.0;

        loop {
            let mut byte = (val % 128) as u8;
            val /= 128;

            if val > 0 {
                byte |= 0x80;
            }

            buf.put_u8(byte);

            if val == 0 {
                return;
            }
        }
    }
}

impl TryDecode for VarSizeInt {
    fn try_decode(bytes: Bytes) -> Result<Self, CodecError> {
        let mut value = 0u32;

        for (pos, byte) in bytes.iter().copied().take(4).enumerate() {
            value += ((byte & 0x7f) as u32) << (7 * pos);

            if byte & 0x80 == 0 {
                return Ok(Self(value));
            }
        }

        Err(MalformedLength.into())
    }
}

/// Quality of service level.
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl Default for QoS {
    fn default() -> Self {
        QoS::AtMostOnce
    }
}

impl TryFrom<u8> for QoS {
    type Error = CodecError;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            _ => Err(InvalidValue.into()),
        }
    }
}

impl ByteLen for u8 {
    fn byte_len(&self) -> usize {
        mem::size_of::<Self>()
    }
}

impl Encode for u8 {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(*self);
    }
}

impl TryDecode for u8 {
    fn try_decode(bytes: Bytes) -> Result<Self, CodecError> {
        bytes
            .first()
            .copied()
            .ok_or_else(|| InvalidVariableHeaderLen.into())
    }
}

impl ByteLen for u16 {
    fn byte_len(&self) -> usize {
        mem::size_of::<Self>()
    }
}

impl Encode for u16 {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(*self);
    }
}

impl TryDecode for u16 {
    fn try_decode(bytes: Bytes) -> Result<Self, CodecError> {
        bytes
            .get(0..mem::size_of::<Self>())
            .map(|buf| Self::from_be_bytes([buf[0], buf[1]]))
            .ok_or_else(|| InvalidVariableHeaderLen.into())
    }
}

impl ByteLen for bool {
    fn byte_len(&self) -> usize {
        mem::size_of::<u8>()
    }
}

impl TryDecode for bool {
    fn try_decode(bytes: Bytes) -> Result<Self, CodecError> {
        match bytes.first().copied() {
            Some(0u8) => Ok(false),
            Some(1u8) => Ok(true),
            Some(_) => Err(InvalidValue.into()),
            None => Err(InvalidVariableHeaderLen.into()),
        }
    }
}

/// UTF-8 string prefixed with its 16-bit big-endian byte length.
pub(crate) type UTF8String = String;

impl ByteLen for UTF8String {
    fn byte_len(&self) -> usize {
        self.len() + mem::size_of::<u16>()
    }
}

impl Encode for UTF8String {
    fn encode(&self, buf: &mut BytesMut) {
        debug_assert!(self.len() <= u16::MAX as usize);
        buf.put_u16(self.len() as u16);
        buf.put_slice(self.as_bytes());
    }
}

impl TryDecode for UTF8String {
    fn try_decode(bytes: Bytes) -> Result<Self, CodecError> {
        let size = u16::try_decode(bytes.clone())? as usize;
        let content = bytes
            .get(mem::size_of::<u16>()..mem::size_of::<u16>() + size)
            .ok_or(InvalidVariableHeaderLen)?;

        UTF8String::from_utf8(Vec::from(content)).map_err(|_| InvalidValue.into())
    }
}

/// Borrowed counterpart of [UTF8String], encode only.
pub(crate) type UTF8StringRef<'a> = &'a str;

impl ByteLen for UTF8StringRef<'_> {
    fn byte_len(&self) -> usize {
        self.len() + mem::size_of::<u16>()
    }
}

impl Encode for UTF8StringRef<'_> {
    fn encode(&self, buf: &mut BytesMut) {
        debug_assert!(self.len() <= u16::MAX as usize);
        buf.put_u16(self.len() as u16);
        buf.put_slice(self.as_bytes());
    }
}

/// Binary data prefixed with its 16-bit big-endian byte length.
pub(crate) type Binary = Bytes;

impl ByteLen for Binary {
    fn byte_len(&self) -> usize {
        self.len() + mem::size_of::<u16>()
    }
}

impl Encode for Binary {
    fn encode(&self, buf: &mut BytesMut) {
        debug_assert!(self.len() <= u16::MAX as usize);
        buf.put_u16(self.len() as u16);
        buf.put_slice(self);
    }
}

impl TryDecode for Binary {
    fn try_decode(bytes: Bytes) -> Result<Self, CodecError> {
        let size = u16::try_decode(bytes.clone())? as usize;

        if bytes.len() < mem::size_of::<u16>() + size {
            return Err(InvalidVariableHeaderLen.into());
        }

        Ok(bytes.slice(mem::size_of::<u16>()..mem::size_of::<u16>() + size))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    mod var_size_int {
        use super::*;

        #[test]
        fn encoded_len() {
            const INPUT: [(u32, usize); 8] = [
                (0, 1),
                (127, 1),
                (128, 2),
                (16383, 2),
                (16384, 3),
                (2097151, 3),
                (2097152, 4),
                (268435455, 4),
            ];

            for (val, expected_len) in INPUT {
                let result = VarSizeInt::try_from(val as usize).unwrap();

                assert_eq!(result.len(), expected_len);

                let mut buf = BytesMut::new();
                result.encode(&mut buf);
                assert_eq!(buf.len(), expected_len);
            }
        }

        #[test]
        fn round_trip() {
            for val in [0usize, 1, 127, 128, 16383, 16384, 2097151, 2097152, 268435455] {
                let encoded = {
                    let mut buf = BytesMut::new();
                    VarSizeInt::try_from(val).unwrap().encode(&mut buf);
                    buf.freeze()
                };

                let result = VarSizeInt::try_decode(encoded).unwrap();
                assert_eq!(usize::from(result), val);
            }
        }

        #[test]
        fn decode_least_significant_first() {
            const INPUT: [(&[u8], u32); 4] = [
                (&[0x7f], 127),
                (&[0xc1, 0x02], 321),
                (&[0xff, 0xff, 0x7f], 2097151),
                (&[0xff, 0xff, 0xff, 0x7f], 268435455),
            ];

            for (bytes, expected) in INPUT {
                let result = VarSizeInt::try_decode(Bytes::from_static(bytes)).unwrap();
                assert_eq!(result.value(), expected);
            }
        }

        #[test]
        fn decode_unterminated() {
            const INPUT: [&[u8]; 2] = [&[0xff, 0xff, 0xff, 0xff], &[0x80]];

            for bytes in INPUT {
                let result = VarSizeInt::try_decode(Bytes::from_static(bytes));
                assert!(matches!(result, Err(CodecError::MalformedLength(_))));
            }
        }

        #[test]
        fn from_out_of_range() {
            let result = VarSizeInt::try_from(VarSizeInt::MAX as usize + 1);
            assert!(matches!(result, Err(CodecError::MalformedLength(_))));
        }
    }

    mod from_bytes {
        use super::*;

        #[test]
        fn two_byte_int() {
            const INPUT: [u8; 2] = [0x01, 0x40];
            let result = u16::try_decode(Bytes::from_static(&INPUT)).unwrap();
            assert_eq!(result, 0x140);
        }

        #[test]
        fn utf8string() {
            const INPUT: [u8; 5] = [0x00, 0x03, b'v', b'a', b'l'];
            let val = UTF8String::try_decode(Bytes::from_static(&INPUT)).unwrap();
            assert_eq!(val, "val");
        }

        #[test]
        fn utf8string_invalid_size() {
            const INPUT: [u8; 5] = [0xff, 0xff, b'v', b'a', b'l'];
            let val = UTF8String::try_decode(Bytes::from_static(&INPUT));
            assert!(val.is_err());
        }

        #[test]
        fn binary() {
            const INPUT: [u8; 6] = [0x00, 0x04, 0x03, 0x76, 0x61, 0x6c];
            let val = Binary::try_decode(Bytes::from_static(&INPUT)).unwrap();
            assert_eq!(&val[..], &[0x03, 0x76, 0x61, 0x6c]);
        }

        #[test]
        fn binary_invalid_size() {
            const INPUT: [u8; 6] = [0xff, 0xff, 0x03, 0x76, 0x61, 0x6c];
            let val = Binary::try_decode(Bytes::from_static(&INPUT));
            assert!(val.is_err());
        }
    }

    mod to_bytes {
        use super::*;

        #[test]
        fn utf8string() {
            let mut buf = BytesMut::new();
            String::from("val").encode(&mut buf);
            assert_eq!(&buf[..], &[0x00, 0x03, b'v', b'a', b'l']);
        }

        #[test]
        fn binary() {
            let mut buf = BytesMut::new();
            Bytes::from_static(&[0x03, 0x76]).encode(&mut buf);
            assert_eq!(&buf[..], &[0x00, 0x02, 0x03, 0x76]);
        }
    }
}
