use crate::codec::{Connect, ConnectBuilder, Publish, PublishBuilder};
use crate::core::{error::CodecError, QoS};
use bytes::Bytes;
use derive_builder::Builder;
use std::time::Duration;

pub(crate) const DEFAULT_CLEAN_SESSION: bool = true;
pub(crate) const DEFAULT_KEEP_ALIVE: u16 = 60;
pub(crate) const DEFAULT_CONNACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Construction-time client configuration.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(error = "CodecError"))]
pub struct ClientOpts {
    /// Bound on how long `connect` waits for the broker's CONNACK after
    /// sending CONNECT. Zero disables the deadline. Defaults to 30 seconds.
    #[builder(default = "DEFAULT_CONNACK_TIMEOUT")]
    connack_timeout: Duration,
}

impl ClientOpts {
    pub(crate) fn connack_timeout(&self) -> Duration {
        self.connack_timeout
    }
}

impl Default for ClientOpts {
    fn default() -> Self {
        Self {
            connack_timeout: DEFAULT_CONNACK_TIMEOUT,
        }
    }
}

/// Options for a single connect attempt.
///
/// Clean session defaults to `true`, keep alive to 60 seconds (zero
/// disables heartbeats). The will fields are all-or-nothing and a password
/// requires a user name; violations surface when the CONNECT packet is
/// built during `connect`.
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(error = "CodecError"))]
pub struct ConnectOpts {
    /// Client identifier requested for this connect attempt. Overridden by
    /// the identifier of a reused persistent session.
    #[builder(setter(into))]
    client_identifier: String,

    /// Whether the broker and client discard session state on disconnect.
    #[builder(default = "DEFAULT_CLEAN_SESSION")]
    clean_session: bool,

    /// Maximum silence interval promised to the broker, in seconds.
    #[builder(default = "DEFAULT_KEEP_ALIVE")]
    keep_alive: u16,

    /// Topic the will message is published to.
    #[builder(setter(strip_option, into), default)]
    will_topic: Option<String>,

    /// Will message published by the broker if the connection drops.
    #[builder(setter(strip_option, into), default)]
    will_message: Option<String>,

    /// QoS of the will message.
    #[builder(default)]
    will_qos: QoS,

    /// Whether the will message is retained.
    #[builder(default)]
    will_retain: bool,

    /// User name for broker authentication.
    #[builder(setter(strip_option, into), default)]
    username: Option<String>,

    /// Password for broker authentication.
    #[builder(setter(strip_option, into), default)]
    password: Option<Bytes>,
}

impl ConnectOpts {
    pub(crate) fn client_identifier(&self) -> &str {
        &self.client_identifier
    }

    pub(crate) fn clean_session(&self) -> bool {
        self.clean_session
    }

    pub(crate) fn keep_alive(&self) -> u16 {
        self.keep_alive
    }

    /// Builds the CONNECT packet, with the effective client identifier
    /// substituted for the requested one.
    pub(crate) fn to_packet(&self, client_identifier: &str) -> Result<Connect, CodecError> {
        let mut builder = ConnectBuilder::default();

        builder.client_identifier(client_identifier);
        builder.clean_session(self.clean_session);
        builder.keep_alive(self.keep_alive);
        builder.will_qos(self.will_qos);
        builder.will_retain(self.will_retain);

        if let Some(val) = self.will_topic.as_deref() {
            builder.will_topic(val);
        }

        if let Some(val) = self.will_message.as_deref() {
            builder.will_message(val);
        }

        if let Some(val) = self.username.as_deref() {
            builder.username(val);
        }

        if let Some(val) = self.password.as_ref() {
            builder.password(val.clone());
        }

        builder.build()
    }
}

/// Options for a PUBLISH packet.
#[derive(Default)]
pub struct PublishOpts {
    builder: PublishBuilder,
}

impl PublishOpts {
    /// Creates empty publish options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mandatory field: the topic the message is published to.
    pub fn topic_name(mut self, val: &str) -> Self {
        self.builder.topic_name(val);
        self
    }

    /// Marks the packet as a re-delivery.
    pub fn dup(mut self, val: bool) -> Self {
        self.builder.dup(val);
        self
    }

    /// Quality of service of the message.
    pub fn qos(mut self, val: QoS) -> Self {
        self.builder.qos(val);
        self
    }

    /// Asks the broker to retain the message.
    pub fn retain(mut self, val: bool) -> Self {
        self.builder.retain(val);
        self
    }

    /// Packet identifier; mandatory for QoS 1 and 2, rejected for QoS 0.
    pub fn packet_identifier(mut self, val: u16) -> Self {
        self.builder.packet_identifier(val);
        self
    }

    /// Application message payload.
    pub fn payload(mut self, val: &[u8]) -> Self {
        self.builder.payload(Bytes::copy_from_slice(val));
        self
    }

    pub(crate) fn build(self) -> Result<Publish, CodecError> {
        self.builder.build()
    }
}
