//! Value conversion routines used by the record transformer.

pub mod uuid;
