pub(crate) mod base_types;
pub(crate) mod error;
pub(crate) mod utils;

pub use base_types::QoS;
