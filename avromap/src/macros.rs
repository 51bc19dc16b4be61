//! Macros for pipeline error handling.
//!
//! Provides convenience macros for creating and returning
//! [`crate::error::AvromapError`] instances with reduced boilerplate.

/// Creates an [`crate::error::AvromapError`] from error kind and description.
///
/// Accepts a static description, optional dynamic detail (use `detail =` to
/// move an owned [`String`]), and an optional source error.
#[macro_export]
macro_rules! avromap_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::AvromapError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        $crate::error::AvromapError::from(($kind, $desc)).with_source($source)
    };
    ($kind:expr, $desc:expr, detail = $detail:expr) => {
        $crate::error::AvromapError::from(($kind, $desc, $detail))
    };
    ($kind:expr, $desc:expr, detail = $detail:expr, source: $source:expr) => {
        $crate::error::AvromapError::from(($kind, $desc, $detail)).with_source($source)
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::AvromapError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Creates and returns an [`crate::error::AvromapError`] from the current
/// function.
///
/// Combines error creation with early return for error conditions that should
/// immediately terminate execution. Supports the `detail =` argument of
/// [`avromap_error!`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return ::core::result::Result::Err($crate::avromap_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, detail = $detail:expr) => {
        return ::core::result::Result::Err($crate::avromap_error!($kind, $desc, detail = $detail))
    };
}
