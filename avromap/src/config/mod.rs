//! Configuration types for the recoding pipeline.
//!
//! All settings are computed once at startup and immutable afterwards. The
//! structs deserialize from any serde source; the binary crate loads them
//! from prefixed environment variables.

use serde::Deserialize;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The mapping delimiter must be a single character.
    #[error("`mapping.delimiter` must be exactly one character (got `{0}`)")]
    DelimiterNotSingleChar(String),
    /// The mapping source size cap cannot be zero.
    #[error("`mapping.max_source_bytes` cannot be zero")]
    MaxSourceBytesZero,
    /// The target column name cannot be empty.
    #[error("`transform.target_column` cannot be empty")]
    TargetColumnEmpty,
    /// The decode blob size cap cannot be zero.
    #[error("`decode.max_blob_size` cannot be zero")]
    MaxBlobSizeZero,
    /// The encode block length cannot be zero.
    #[error("`encode.block_len` cannot be zero")]
    BlockLenZero,
}

/// Output container compression codec selection.
///
/// `bzip2` and `xz` are accepted as configuration for compatibility with
/// existing deployments but always downgrade to `null` at encode time.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CodecName {
    Null,
    Deflate,
    Snappy,
    Zstandard,
    Bzip2,
    Xz,
}

impl Default for CodecName {
    fn default() -> Self {
        Self::Null
    }
}

/// Output representation of the rewritten column.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOutput {
    /// Raw 16-byte identifier value.
    Raw,
    /// Canonical dashed lowercase text form.
    Text,
}

impl Default for ColumnOutput {
    fn default() -> Self {
        Self::Raw
    }
}

/// Behavior when a key is not present in the mapping table.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Fail the record (and therefore the pipeline) on an unseen key.
    Fail,
    /// Substitute the nil identifier on an unseen key; never fails.
    SubstituteNil,
}

impl Default for MissPolicy {
    fn default() -> Self {
        Self::SubstituteNil
    }
}

/// Configuration for building the mapping table from its line source.
#[derive(Clone, Debug, Deserialize)]
pub struct MappingConfig {
    /// Single-character delimiter between key and identifier on each line.
    #[serde(default = "default_mapping_delimiter")]
    pub delimiter: String,
    /// Maximum number of bytes read from the mapping source.
    ///
    /// Caps memory use on a hostile or oversized input; bytes past the cap
    /// are never read.
    #[serde(default = "default_mapping_max_source_bytes")]
    pub max_source_bytes: u64,
}

impl MappingConfig {
    /// Default key/identifier delimiter.
    pub const DEFAULT_DELIMITER: &'static str = ",";

    /// Default mapping source size cap in bytes.
    pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 1024 * 1024;

    /// Validates mapping configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.delimiter.chars().count() != 1 {
            return Err(ValidationError::DelimiterNotSingleChar(
                self.delimiter.clone(),
            ));
        }

        if self.max_source_bytes == 0 {
            return Err(ValidationError::MaxSourceBytesZero);
        }

        Ok(())
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            delimiter: default_mapping_delimiter(),
            max_source_bytes: default_mapping_max_source_bytes(),
        }
    }
}

fn default_mapping_delimiter() -> String {
    MappingConfig::DEFAULT_DELIMITER.to_string()
}

fn default_mapping_max_source_bytes() -> u64 {
    MappingConfig::DEFAULT_MAX_SOURCE_BYTES
}

/// Configuration for the per-record column rewrite.
#[derive(Clone, Debug, Deserialize)]
pub struct TransformConfig {
    /// Name of the single column subject to rewriting.
    pub target_column: String,
    /// Output representation of the rewritten column.
    #[serde(default)]
    pub output: ColumnOutput,
    /// Behavior on a lookup-table miss.
    #[serde(default)]
    pub on_missing: MissPolicy,
}

impl TransformConfig {
    /// Validates transform configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.target_column.is_empty() {
            return Err(ValidationError::TargetColumnEmpty);
        }

        Ok(())
    }
}

/// Configuration for the container decode adapter.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DecodeConfig {
    /// Maximum size in bytes of a single decoded blob.
    ///
    /// Caps memory use on malformed or adversarial length-prefixed byte
    /// fields.
    #[serde(default = "default_decode_max_blob_size")]
    pub max_blob_size: usize,
}

impl DecodeConfig {
    /// Default decoded blob size cap in bytes.
    pub const DEFAULT_MAX_BLOB_SIZE: usize = 1024 * 1024;

    /// Validates decode configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_blob_size == 0 {
            return Err(ValidationError::MaxBlobSizeZero);
        }

        Ok(())
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_blob_size: default_decode_max_blob_size(),
        }
    }
}

fn default_decode_max_blob_size() -> usize {
    DecodeConfig::DEFAULT_MAX_BLOB_SIZE
}

/// Configuration for the container encode adapter.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct EncodeConfig {
    /// Compression codec for the output container.
    #[serde(default)]
    pub codec: CodecName,
    /// Upper bound on records per container block.
    ///
    /// The encoder flushes after every record, so blocks never grow past a
    /// single record in practice; the setting is retained as part of the
    /// configuration surface.
    #[serde(default = "default_encode_block_len")]
    pub block_len: usize,
}

impl EncodeConfig {
    /// Default number of records per container block.
    pub const DEFAULT_BLOCK_LEN: usize = 100;

    /// Validates encode configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.block_len == 0 {
            return Err(ValidationError::BlockLenZero);
        }

        Ok(())
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            codec: CodecName::default(),
            block_len: default_encode_block_len(),
        }
    }
}

fn default_encode_block_len() -> usize {
    EncodeConfig::DEFAULT_BLOCK_LEN
}
