//! Error types and result definitions for the recoding pipeline.
//!
//! Provides a classified error type with captured diagnostic metadata. An
//! [`AvromapError`] carries an [`ErrorKind`], a static description, optional
//! dynamic detail, an optional source error, and the callsite it was created
//! at.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for pipeline operations using [`AvromapError`].
pub type AvromapResult<T> = Result<T, AvromapError>;

/// Specific categories of errors that can occur while recoding a container.
///
/// The pipeline is fail-fast: any of these halts it. The split between
/// pre-pipeline kinds (config, schema, mapping source) and per-record kinds
/// (column type, lookup miss, codec errors) only matters for when the error
/// can surface, not for how it propagates.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Pre-pipeline errors.
    ConfigError,
    ValidationError,
    SchemaParseError,
    MappingSourceError,

    // Per-record transformation errors.
    MalformedUuid,
    UuidNotFound,
    InvalidColumnType,
    InvalidData,

    // Container codec errors.
    DecodeError,
    EncodeError,

    // IO errors.
    IoError,

    /// Consumer-requested stop. Propagated as the pipeline's result but not
    /// logged as an application error.
    Cancelled,

    Unknown,
}

/// Detailed payload stored inside an [`AvromapError`].
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

/// Main error type for recoding operations.
#[derive(Debug, Clone)]
pub struct AvromapError {
    payload: ErrorPayload,
}

impl AvromapError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.payload.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.payload.detail.as_deref()
    }

    /// Returns the captured backtrace for this error.
    pub fn backtrace(&self) -> &Backtrace {
        self.payload.backtrace.as_ref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.payload.location
    }

    /// Attaches an originating [`error::Error`] to this error and returns the
    /// modified instance. The stored source is preserved across clones and
    /// exposed via [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.payload.source = Some(Arc::new(source));
        self
    }

    /// Creates an [`AvromapError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        let location = Location::caller();
        let backtrace = Arc::new(Backtrace::capture());

        AvromapError {
            payload: ErrorPayload {
                kind,
                description,
                detail,
                source,
                location,
                backtrace,
            },
        }
    }
}

impl PartialEq for AvromapError {
    /// Compares errors by [`ErrorKind`] only, ignoring descriptions, details,
    /// and captured callsites.
    fn eq(&self, other: &AvromapError) -> bool {
        self.payload.kind == other.payload.kind
    }
}

impl fmt::Display for AvromapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let location = self.payload.location;
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.payload.kind,
            self.payload.description,
            location.file(),
            location.line(),
            location.column()
        )?;

        if let Some(detail) = self.payload.detail.as_deref() {
            write!(f, "\n  Detail: {detail}")?;
        }

        Ok(())
    }
}

impl error::Error for AvromapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.payload
            .source
            .as_deref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Creates an [`AvromapError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for AvromapError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> AvromapError {
        AvromapError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates an [`AvromapError`] from an error kind, static description, and
/// dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for AvromapError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> AvromapError {
        AvromapError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts [`std::io::Error`] to [`AvromapError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for AvromapError {
    #[track_caller]
    fn from(err: std::io::Error) -> AvromapError {
        let detail = err.to_string();
        let source = Arc::new(err);
        AvromapError::from_components(
            ErrorKind::IoError,
            Cow::Borrowed("I/O operation failed"),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}
