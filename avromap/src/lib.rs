//! Streaming rewrite of a single Avro Object Container File column between
//! string keys and 128-bit identifiers.
//!
//! The pipeline is pull-based and single-threaded: the encode adapter pulls
//! from the [`transform::RecordTransformer`], which pulls from the
//! [`avro::decode::RecordStream`], one record at a time. The first error
//! anywhere halts the whole pipeline.

pub mod avro;
pub mod concurrency;
pub mod config;
pub mod conversions;
pub mod error;
mod macros;
pub mod mapping;
pub mod transform;
