//! Error type for the recoder binary.

use std::error::Error;
use std::io;

use avromap::error::{AvromapError, ErrorKind};

/// Result type for recoder operations.
pub type RecoderResult<T> = Result<T, RecoderError>;

/// Error type for the recoder binary.
///
/// Wraps [`AvromapError`] for pipeline errors and provides variants for the
/// infrastructure concerns around it.
#[derive(Debug, thiserror::Error)]
pub enum RecoderError {
    /// Pipeline error from the core library.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] AvromapError),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[source] Box<dyn Error + Send + Sync>),

    /// I/O error outside the pipeline (opening the mapping or schema file).
    #[error("i/o error reading `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl RecoderError {
    /// Returns whether this error is a consumer-requested stop rather than
    /// an application failure. A cancellation still exits non-zero, but it
    /// is not reported as an error.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RecoderError::Pipeline(err) if err.kind() == ErrorKind::Cancelled)
    }

    /// Creates a configuration error from any boxed source.
    pub fn config<E: Error + Send + Sync + 'static>(err: E) -> Self {
        RecoderError::Config(Box::new(err))
    }

    /// Creates an I/O error annotated with the offending path.
    pub fn io(path: &std::path::Path, source: io::Error) -> Self {
        RecoderError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
