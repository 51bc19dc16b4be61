//! Environment-driven configuration loading for the recoder binary.
//!
//! All settings come from `AVROMAP_`-prefixed environment variables. Nested
//! keys use double underscores, e.g. `AVROMAP_TRANSFORM__TARGET_COLUMN` maps
//! to `transform.target_column`.

use std::path::PathBuf;

use serde::Deserialize;

use avromap::config::{DecodeConfig, EncodeConfig, MappingConfig, TransformConfig};

use crate::error::{RecoderError, RecoderResult};

/// Prefix for environment variable configuration keys.
const ENV_PREFIX: &str = "AVROMAP";

/// Separator between the prefix and the first configuration key.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested configuration keys in environment variables.
const ENV_SEPARATOR: &str = "__";

/// Complete configuration for one recoder run.
#[derive(Clone, Debug, Deserialize)]
pub struct RecoderConfig {
    /// Path of the `KEY<delim>IDENTIFIER` mapping file.
    pub mapping_path: PathBuf,
    /// Path of the output schema definition.
    pub schema_path: PathBuf,
    /// Mapping source settings.
    #[serde(default)]
    pub mapping: MappingConfig,
    /// Column rewrite settings.
    pub transform: TransformConfig,
    /// Input container settings.
    #[serde(default)]
    pub decode: DecodeConfig,
    /// Output container settings.
    #[serde(default)]
    pub encode: EncodeConfig,
}

impl RecoderConfig {
    /// Validates all nested configuration sections.
    fn validate(&self) -> Result<(), avromap::config::ValidationError> {
        self.mapping.validate()?;
        self.transform.validate()?;
        self.decode.validate()?;
        self.encode.validate()
    }
}

/// Loads and validates the recoder configuration from the environment.
pub fn load_recoder_config() -> RecoderResult<RecoderConfig> {
    let environment = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true);

    let raw = config::Config::builder()
        .add_source(environment)
        .build()
        .map_err(RecoderError::config)?;

    let recoder_config: RecoderConfig = raw
        .try_deserialize()
        .map_err(RecoderError::config)?;

    recoder_config.validate().map_err(RecoderError::config)?;

    Ok(recoder_config)
}
