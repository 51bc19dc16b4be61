//! Coordination primitives for pipeline shutdown.

pub mod shutdown;
