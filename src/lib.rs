#![forbid(unsafe_code, unreachable_pub)]
#![warn(missing_docs)]

//! Courier is an asynchronous MQTT 3.1.1 client library built on Tokio.
//!
//! ## Set up
//!
//! A [Client] is created from [ClientOpts] and dials the broker itself —
//! by default over plain TCP:
//!
//! ```no_run
//! use courier::{Client, ClientOpts, ConnectOptsBuilder, PublishOpts, QoS};
//! use std::error::Error;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let client = Client::new(ClientOpts::default());
//!
//!     let opts = ConnectOptsBuilder::default()
//!         .client_identifier("courier-example")
//!         .build()?;
//!
//!     // Dial, perform the CONNECT/CONNACK handshake and start the
//!     // background send and receive loops.
//!     client.connect("tcp", "localhost:1883", opts).await?;
//!
//!     client
//!         .publish(
//!             PublishOpts::new()
//!                 .topic_name("greetings")
//!                 .qos(QoS::AtMostOnce)
//!                 .payload(b"hello"),
//!         )
//!         .await?;
//!
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency model
//!
//! Once connected, two background tasks run for the lifetime of the
//! connection: a send loop draining the ordered outbound queue (with the
//! keep-alive heartbeat folded into its timer) and a receive loop decoding
//! inbound packets. Packets are flushed to the wire one at a time in
//! submission order; inbound packets are delivered through
//! [recv](Client::recv) (or the [packets](Client::packets) stream) in wire
//! arrival order.
//!
//! Synchronous calls — [connect](Client::connect),
//! [disconnect](Client::disconnect), [send](Client::send) — return errors
//! directly. Failures observed by the background loops tear the connection
//! down and surface through [next_error](Client::next_error) (or the
//! [errors](Client::errors) stream), never silently dropped while the sink
//! has capacity.
//!
//! ## Sessions
//!
//! Connecting with clean session (the default) creates a session that is
//! discarded on disconnect. A persistent session survives disconnects and
//! is reattached by the next connect; its client identifier overrides the
//! one requested for that attempt.
//!
//! ## Transports
//!
//! The wire runs over anything implementing [Dialer]; the default is
//! [TcpDialer]. The client issues exactly one dial per connect call,
//! identified by a (network kind, address) pair such as
//! `("tcp", "host:port")`.

mod client;
mod codec;
mod core;
mod io;

pub use crate::client::*;
pub use crate::codec::{
    Connack, Connect, ConnectBuilder, ConnectReturnCode, Disconnect, PacketType, Pingreq,
    Pingresp, Puback, Publish, PublishBuilder, Pubrec, RxPacket, TxPacket,
};
pub use crate::core::QoS;
pub use crate::io::{Dialer, TcpDialer};

/// Library error types.
pub mod error {
    pub use crate::client::{
        AlreadyConnected, ClientError, ConnackTimeout, NotConnack, NotYetConnected, TeardownError,
    };
    pub use crate::core::error::*;
}

#[allow(missing_docs)]
pub mod prelude {
    pub use futures::stream::{Stream, StreamExt};
}
