//! Wiring of the recoding pipeline: files, stdio, and the pull chain.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::info;

use avromap::avro::decode::RecordStream;
use avromap::avro::encode::write_records;
use avromap::concurrency::shutdown::ShutdownToken;
use avromap::mapping::resolver::UuidResolver;
use avromap::mapping::table::MappingTable;
use avromap::transform::{ColumnRewrite, RecordTransformer};

use crate::config::RecoderConfig;
use crate::error::{RecoderError, RecoderResult};

/// Maximum number of bytes read from the schema file.
const SCHEMA_FILE_MAX_BYTES: u64 = 1024 * 1024;

/// Reads the output schema definition, capped at [`SCHEMA_FILE_MAX_BYTES`].
fn read_schema(path: &Path) -> RecoderResult<String> {
    let file = File::open(path).map_err(|err| RecoderError::io(path, err))?;

    let mut schema_text = String::new();
    file.take(SCHEMA_FILE_MAX_BYTES)
        .read_to_string(&mut schema_text)
        .map_err(|err| RecoderError::io(path, err))?;

    Ok(schema_text)
}

/// Runs one recoding pass: stdin container in, stdout container out.
///
/// The mapping table is built to completion before the first record is
/// pulled; afterwards the pipeline holds at most one record in flight.
pub fn start_recoder_with_config(
    config: RecoderConfig,
    shutdown: ShutdownToken,
) -> RecoderResult<()> {
    let schema_text = read_schema(&config.schema_path)?;

    let mapping_file = File::open(&config.mapping_path)
        .map_err(|err| RecoderError::io(&config.mapping_path, err))?;
    let table = MappingTable::from_reader(mapping_file, &config.mapping)?;
    info!(
        entries = table.len(),
        target_column = %config.transform.target_column,
        "mapping table loaded"
    );

    let resolver = UuidResolver::new(table, config.transform.on_missing);
    let rewrite = ColumnRewrite::new(
        config.transform.target_column.clone(),
        resolver,
        config.transform.output,
    );

    let input = io::stdin().lock();
    let output = io::stdout().lock();

    let records = RecordStream::new(input, &config.decode);
    let transformed = RecordTransformer::new(records, rewrite);
    write_records(transformed, output, &schema_text, &config.encode, &shutdown)?;

    info!("recoding finished");

    Ok(())
}
