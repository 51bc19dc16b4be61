//! Container decode adapter: byte stream to fallible record sequence.

use std::io::{BufReader, Read};

use apache_avro::Reader;
use apache_avro::types::Value;

use crate::avromap_error;
use crate::config::DecodeConfig;
use crate::error::{AvromapError, AvromapResult, ErrorKind};

/// Fallible lazy sequence of records decoded from a container byte stream.
///
/// A decoder-construction failure is reported once as the first item of the
/// sequence, which then ends. A per-record decode error likewise ends the
/// sequence after being yielded; no resynchronization is attempted.
pub struct RecordStream<R: Read> {
    state: StreamState<R>,
}

enum StreamState<R: Read> {
    Open(Reader<'static, BufReader<R>>),
    Failed(Option<AvromapError>),
    Done,
}

impl<R: Read> RecordStream<R> {
    /// Opens a decoder over the byte stream.
    ///
    /// Applies the decoded blob size cap before construction. The cap is a
    /// process-wide setting of the underlying codec; the first value applied
    /// wins for the lifetime of the process.
    pub fn new(reader: R, config: &DecodeConfig) -> Self {
        apache_avro::max_allocation_bytes(config.max_blob_size);

        let state = match Reader::new(BufReader::new(reader)) {
            Ok(inner) => StreamState::Open(inner),
            Err(err) => StreamState::Failed(Some(avromap_error!(
                ErrorKind::DecodeError,
                "Could not open the input container",
                source: err
            ))),
        };

        Self { state }
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = AvromapResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let last = match &mut self.state {
            StreamState::Open(reader) => match reader.next() {
                Some(Ok(record)) => return Some(Ok(record)),
                Some(Err(err)) => Some(Err(avromap_error!(
                    ErrorKind::DecodeError,
                    "Could not decode a record from the input container",
                    source: err
                ))),
                None => None,
            },
            StreamState::Failed(err) => err.take().map(Err),
            StreamState::Done => return None,
        };

        self.state = StreamState::Done;
        last
    }
}
