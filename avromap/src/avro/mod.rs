//! Container-format adapters bridging byte streams and record sequences.

pub mod decode;
pub mod encode;
