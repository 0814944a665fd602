use crate::codec::{FixedHeader, RxPacket, TxPacket};
use crate::core::{
    base_types::VarSizeInt,
    error::{CodecError, MalformedLength},
};
use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

/// Failure of the framing layer: either the transport or the packet codec.
#[derive(Debug)]
pub(crate) enum PacketStreamError {
    Io(io::Error),
    Codec(CodecError),
}

impl From<io::Error> for PacketStreamError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<CodecError> for PacketStreamError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

/// Inbound half of a connection: reads whole control packets off a
/// buffered byte stream.
pub(crate) struct RxPacketStream<StreamT> {
    stream: BufReader<StreamT>,
}

impl<StreamT> RxPacketStream<StreamT>
where
    StreamT: AsyncRead + Unpin,
{
    pub(crate) fn with_capacity(capacity: usize, stream: StreamT) -> Self {
        Self {
            stream: BufReader::with_capacity(capacity, stream),
        }
    }

    async fn read_fixed_header(&mut self) -> Result<FixedHeader, PacketStreamError> {
        let type_and_flags = self.stream.read_u8().await?;

        let mut value = 0u32;
        let mut pos = 0;

        loop {
            let byte = self.stream.read_u8().await?;
            value += ((byte & 0x7f) as u32) << (7 * pos);

            if byte & 0x80 == 0 {
                break;
            }

            pos += 1;
            if pos == 4 {
                return Err(CodecError::from(MalformedLength).into());
            }
        }

        let remaining_len = VarSizeInt::try_from(value as usize)?;
        Ok(FixedHeader::new(type_and_flags, remaining_len))
    }

    /// Reads exactly one control packet: the fixed header, then the number
    /// of bytes the header declares, which are handed to the codec of the
    /// packet type as one slice.
    pub(crate) async fn read(&mut self) -> Result<RxPacket, PacketStreamError> {
        let header = self.read_fixed_header().await?;

        let mut remaining = vec![0u8; header.remaining_len() as usize];
        if !remaining.is_empty() {
            self.stream.read_exact(&mut remaining).await?;
        }

        RxPacket::try_decode(&header, remaining.into()).map_err(Into::into)
    }
}

/// Outbound half of a connection: serializes control packets onto a
/// buffered byte stream, flushing after every packet.
pub(crate) struct TxPacketStream<StreamT> {
    stream: BufWriter<StreamT>,
}

impl<StreamT> TxPacketStream<StreamT>
where
    StreamT: AsyncWrite + Unpin,
{
    pub(crate) fn from(stream: StreamT) -> Self {
        Self {
            stream: BufWriter::new(stream),
        }
    }

    pub(crate) async fn write(&mut self, packet: &TxPacket) -> Result<(), PacketStreamError> {
        let mut buf = BytesMut::new();
        packet.try_encode(&mut buf)?;

        self.stream.write_all(&buf).await?;
        self.stream.flush().await?;
        Ok(())
    }

    pub(crate) async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::{Connect, ConnectBuilder, Pingreq, Puback, Pubrec, PublishBuilder};
    use crate::core::QoS;
    use bytes::Bytes;

    fn connect_packet() -> Connect {
        let mut builder = ConnectBuilder::default();
        builder.client_identifier("reader");
        builder.clean_session(true);
        builder.keep_alive(60);
        builder.build().unwrap()
    }

    #[tokio::test]
    async fn read_connack() {
        const INPUT: [u8; 4] = [0x20, 0x02, 0x01, 0x00];

        let mut stream = RxPacketStream::with_capacity(256, &INPUT[..]);
        let packet = stream.read().await.unwrap();

        match packet {
            RxPacket::Connack(connack) => {
                assert!(connack.session_present());
            }
            other => panic!("unexpected packet: {:?}", other),
        }
    }

    #[tokio::test]
    async fn read_consecutive_packets() {
        const INPUT: [u8; 8] = [0x40, 0x02, 0x00, 0x01, 0x50, 0x02, 0x00, 0x02];

        let mut stream = RxPacketStream::with_capacity(256, &INPUT[..]);

        assert!(matches!(
            stream.read().await.unwrap(),
            RxPacket::Puback(packet) if packet.packet_identifier() == 1
        ));
        assert!(matches!(
            stream.read().await.unwrap(),
            RxPacket::Pubrec(packet) if packet.packet_identifier() == 2
        ));
    }

    #[tokio::test]
    async fn read_malformed_remaining_length() {
        const INPUT: [u8; 6] = [0x20, 0xff, 0xff, 0xff, 0xff, 0x00];

        let mut stream = RxPacketStream::with_capacity(256, &INPUT[..]);
        let result = stream.read().await;

        assert!(matches!(
            result,
            Err(PacketStreamError::Codec(CodecError::MalformedLength(_)))
        ));
    }

    #[tokio::test]
    async fn read_truncated_packet() {
        const INPUT: [u8; 3] = [0x20, 0x02, 0x01];

        let mut stream = RxPacketStream::with_capacity(256, &INPUT[..]);
        let result = stream.read().await;

        assert!(matches!(result, Err(PacketStreamError::Io(_))));
    }

    #[tokio::test]
    async fn read_eof() {
        let mut stream = RxPacketStream::with_capacity(256, &[][..]);
        let result = stream.read().await;

        assert!(matches!(result, Err(PacketStreamError::Io(_))));
    }

    #[tokio::test]
    async fn write_read_round_trip() {
        let (client, broker) = tokio::io::duplex(4096);

        let mut tx = TxPacketStream::from(client);
        let mut rx = RxPacketStream::with_capacity(256, broker);

        let publish = {
            let mut builder = PublishBuilder::default();
            builder.topic_name("a/b");
            builder.qos(QoS::AtLeastOnce);
            builder.packet_identifier(7);
            builder.payload(Bytes::from_static(b"payload"));
            builder.build().unwrap()
        };

        let outbound = [
            TxPacket::Publish(publish.clone()),
            TxPacket::Puback(Puback::new(7)),
            TxPacket::Pubrec(Pubrec::new(8)),
            TxPacket::Pingreq(Pingreq),
        ];

        for packet in &outbound {
            tx.write(packet).await.unwrap();
        }

        assert!(matches!(
            rx.read().await.unwrap(),
            RxPacket::Publish(decoded) if decoded == publish
        ));
        assert!(matches!(
            rx.read().await.unwrap(),
            RxPacket::Puback(decoded) if decoded.packet_identifier() == 7
        ));
        assert!(matches!(
            rx.read().await.unwrap(),
            RxPacket::Pubrec(decoded) if decoded.packet_identifier() == 8
        ));

        // PINGREQ is a valid control packet type, but not one a client ever
        // receives; the registry reports it as unsupported.
        assert!(matches!(
            rx.read().await,
            Err(PacketStreamError::Codec(CodecError::UnsupportedPacketType(_)))
        ));
    }

    #[tokio::test]
    async fn write_flushes_every_packet() {
        let (client, broker) = tokio::io::duplex(4096);

        let mut tx = TxPacketStream::from(client);
        let mut rx = RxPacketStream::with_capacity(256, broker);

        // With a buffered writer, the packet is only visible to the peer if
        // write flushed it.
        tx.write(&TxPacket::Connect(connect_packet())).await.unwrap();

        let mut header = [0u8; 2];
        rx.stream.read_exact(&mut header).await.unwrap();
        assert_eq!(header[0], 0x10);
    }
}
