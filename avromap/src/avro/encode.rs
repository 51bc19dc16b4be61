//! Container encode adapter: fallible record sequence to byte stream.

use std::io::Write;

use apache_avro::types::Value;
use apache_avro::{Codec, Schema, Writer, ZstandardSettings};

use crate::concurrency::shutdown::ShutdownToken;
use crate::config::{CodecName, EncodeConfig};
use crate::error::{AvromapResult, ErrorKind};
use crate::{avromap_error, bail};

/// Maps the configured codec name onto the container codec.
///
/// `bzip2` and `xz` are accepted configuration but downgrade to no
/// compression instead of failing; existing deployments rely on this shim.
fn resolve_codec(codec: CodecName) -> Codec {
    match codec {
        CodecName::Null => Codec::Null,
        CodecName::Deflate => Codec::Deflate,
        CodecName::Snappy => Codec::Snappy,
        CodecName::Zstandard => Codec::Zstandard(ZstandardSettings::default()),
        CodecName::Bzip2 | CodecName::Xz => Codec::Null,
    }
}

/// Encodes the record sequence into a container under the given schema.
///
/// The schema is parsed once; an invalid schema aborts before any record is
/// pulled. The writer flushes after every record and once more at stream end,
/// so partial output is visible to downstream consumers as soon as a record
/// is encoded. Before each record the shutdown token is checked; a requested
/// shutdown stops encoding with [`ErrorKind::Cancelled`]. An upstream error
/// item is returned as-is and encoding stops.
pub fn write_records<I, W>(
    records: I,
    writer: W,
    schema_text: &str,
    config: &EncodeConfig,
    shutdown: &ShutdownToken,
) -> AvromapResult<()>
where
    I: IntoIterator<Item = AvromapResult<Value>>,
    W: Write,
{
    let schema = Schema::parse_str(schema_text).map_err(|err| {
        avromap_error!(
            ErrorKind::SchemaParseError,
            "Could not parse the output schema",
            source: err
        )
    })?;

    let mut writer = Writer::with_codec(&schema, writer, resolve_codec(config.codec));

    for record in records {
        if shutdown.is_cancelled() {
            bail!(ErrorKind::Cancelled, "Encoding stopped by shutdown request");
        }

        let record = record?;

        writer.append(record).map_err(|err| {
            avromap_error!(
                ErrorKind::EncodeError,
                "Could not encode a record into the output container",
                source: err
            )
        })?;
        writer.flush().map_err(|err| {
            avromap_error!(
                ErrorKind::EncodeError,
                "Could not flush the output container",
                source: err
            )
        })?;
    }

    writer.into_inner().map_err(|err| {
        avromap_error!(
            ErrorKind::EncodeError,
            "Could not finalize the output container",
            source: err
        )
    })?;

    Ok(())
}
