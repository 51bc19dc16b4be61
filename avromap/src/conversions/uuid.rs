//! Parsing, formatting, and Avro rendering of 128-bit identifiers.
//!
//! The canonical text form is the dashed lowercase hex grouping. The nil
//! (all-zero) identifier is the universal "no value" sentinel substituted on
//! lookup misses; it is distinct from an absent value, which renders to Avro
//! `null`.

use apache_avro::types::Value;
use uuid::Uuid;

use crate::avromap_error;
use crate::config::ColumnOutput;
use crate::error::{AvromapResult, ErrorKind};

/// Parses a textual identifier into a 16-byte value.
///
/// Accepts the canonical dashed format, case-insensitively. Fails with
/// [`ErrorKind::MalformedUuid`] when the text is not a valid 128-bit
/// identifier.
pub fn parse_uuid(text: &str) -> AvromapResult<Uuid> {
    Uuid::parse_str(text).map_err(|err| {
        avromap_error!(
            ErrorKind::MalformedUuid,
            "Could not parse text as a 128-bit identifier",
            detail = text.to_string(),
            source: err
        )
    })
}

/// Formats an identifier into its canonical dashed lowercase form.
pub fn format_uuid(value: &Uuid) -> String {
    value.as_hyphenated().to_string()
}

/// Renders a nullable identifier into the Avro value shape required by the
/// output configuration.
///
/// An absent identifier always renders to [`Value::Null`], regardless of the
/// output setting.
pub fn render_uuid(value: Option<Uuid>, output: ColumnOutput) -> Value {
    match value {
        None => Value::Null,
        Some(uuid) => match output {
            ColumnOutput::Raw => Value::Bytes(uuid.as_bytes().to_vec()),
            ColumnOutput::Text => Value::String(format_uuid(&uuid)),
        },
    }
}
