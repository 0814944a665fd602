mod ack;
mod header;

mod connack;
mod pingresp;
mod puback;
mod publish;
mod pubrec;

mod connect;
mod disconnect;
mod pingreq;

mod packets;

pub use connack::{Connack, ConnectReturnCode};
pub use connect::{Connect, ConnectBuilder};
pub use disconnect::Disconnect;
pub use header::PacketType;
pub use packets::{RxPacket, TxPacket};
pub use pingreq::Pingreq;
pub use pingresp::Pingresp;
pub use puback::Puback;
pub use publish::{Publish, PublishBuilder};
pub use pubrec::Pubrec;

pub(crate) use header::FixedHeader;
