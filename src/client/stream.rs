use crate::client::{Client, ClientError};
use crate::codec::RxPacket;
use crate::io::Dialer;
use futures::stream::{self, Stream};

impl<DialerT: Dialer> Client<DialerT> {
    /// Decoded inbound packets as an async stream, in wire arrival order.
    ///
    /// The stream is a view over the same channel served by
    /// [recv](Client::recv); a packet is delivered to whichever consumer
    /// pulls it first.
    pub fn packets(&self) -> impl Stream<Item = RxPacket> + '_ {
        stream::unfold(self, |client| async move {
            client.recv().await.map(|packet| (packet, client))
        })
    }

    /// Asynchronous failures of the background loops as an async stream.
    pub fn errors(&self) -> impl Stream<Item = ClientError> + '_ {
        stream::unfold(self, |client| async move {
            client.next_error().await.map(|error| (error, client))
        })
    }
}
