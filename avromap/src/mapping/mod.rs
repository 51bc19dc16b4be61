//! Lookup-table construction and key resolution.
//!
//! The [`table::MappingTable`] is built once, before any record is
//! transformed, from a line-oriented `KEY<delim>IDENTIFIER` source. The
//! [`resolver::UuidResolver`] wraps it with a configurable miss policy and is
//! read-only for the lifetime of the pipeline.

pub mod resolver;
pub mod table;
