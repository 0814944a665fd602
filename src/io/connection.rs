use crate::codec::{RxPacket, TxPacket};
use crate::io::packet_stream::{PacketStreamError, RxPacketStream, TxPacketStream};
use std::io;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::sync::Mutex;

const READ_BUFFER_SIZE: usize = 256;

/// One live byte stream, split into a buffered read view and a buffered
/// write view. Owned exclusively by the client while connected; closing it
/// is the only way to release the underlying stream.
///
/// The two halves are guarded by separate locks so a blocked read never
/// delays a write. Neither lock is ever held together with the client
/// state lock across I/O.
pub(crate) struct Connection<StreamT> {
    rx: Mutex<RxPacketStream<ReadHalf<StreamT>>>,
    tx: Mutex<TxPacketStream<WriteHalf<StreamT>>>,
}

impl<StreamT> Connection<StreamT>
where
    StreamT: AsyncRead + AsyncWrite + Send,
{
    pub(crate) fn new(stream: StreamT) -> Self {
        let (rx, tx) = tokio::io::split(stream);

        Self {
            rx: Mutex::new(RxPacketStream::with_capacity(READ_BUFFER_SIZE, rx)),
            tx: Mutex::new(TxPacketStream::from(tx)),
        }
    }

    /// Blocks until one whole control packet has been read and decoded.
    pub(crate) async fn read_packet(&self) -> Result<RxPacket, PacketStreamError> {
        self.rx.lock().await.read().await
    }

    /// Serializes the packet and flushes it onto the wire.
    pub(crate) async fn write_packet(&self, packet: &TxPacket) -> Result<(), PacketStreamError> {
        self.tx.lock().await.write(packet).await
    }

    /// Best-effort variant of [write_packet](Self::write_packet): if the
    /// writer is currently busy, the packet is dropped and `None` is
    /// returned instead of waiting.
    pub(crate) async fn try_write_packet(
        &self,
        packet: &TxPacket,
    ) -> Option<Result<(), PacketStreamError>> {
        match self.tx.try_lock() {
            Ok(mut tx) => Some(tx.write(packet).await),
            Err(_) => None,
        }
    }

    /// Shuts the write half down, releasing the underlying stream.
    pub(crate) async fn close(&self) -> io::Result<()> {
        self.tx.lock().await.shutdown().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::{Pingreq, Puback};
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn write_then_read() {
        let (client, mut broker) = tokio::io::duplex(4096);
        let connection = Connection::new(client);

        connection
            .write_packet(&TxPacket::Pingreq(Pingreq))
            .await
            .unwrap();

        broker.write_all(&[0x40, 0x02, 0x00, 0x09]).await.unwrap();

        assert!(matches!(
            connection.read_packet().await.unwrap(),
            RxPacket::Puback(packet) if packet.packet_identifier() == 9
        ));
    }

    #[tokio::test]
    async fn close_is_observed_by_peer() {
        let (client, broker) = tokio::io::duplex(4096);
        let connection = Connection::new(client);

        connection.close().await.unwrap();

        let mut rx = RxPacketStream::with_capacity(READ_BUFFER_SIZE, broker);
        assert!(matches!(
            rx.read().await,
            Err(PacketStreamError::Io(_))
        ));
    }

    #[tokio::test]
    async fn try_write_skips_when_writer_is_busy() {
        let (client, _broker) = tokio::io::duplex(4096);
        let connection = Connection::new(client);

        let _guard = connection.tx.lock().await;

        assert!(connection
            .try_write_packet(&TxPacket::Pingreq(Pingreq))
            .await
            .is_none());
    }
}
