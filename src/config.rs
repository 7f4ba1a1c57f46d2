//! Runtime configuration.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! `AVWX_`-prefixed environment variables (`AVWX_PROCESSING__MAX_WORKERS=4`).

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    CONFIG_ENV_PREFIX, CONFIG_PATH_ENV, DEFAULT_CHUNK_SIZE, DEFAULT_CONFIG_FILE,
};

/// Report decoding behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ParserConfig {
    /// Reject a report at its first undecodable group instead of skipping the group
    pub strict: bool,

    /// Decode the NOAA remarks section rather than keeping it as free text
    pub decode_remarks: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict: false,
            decode_remarks: true,
        }
    }
}

/// Batch processing resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Worker threads for the decode pool
    #[validate(range(min = 1, message = "max_workers must be at least 1"))]
    pub max_workers: usize,

    /// Reports handed to a worker at a time
    #[validate(range(min = 1, message = "chunk_size must be at least 1"))]
    pub chunk_size: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print single-report JSON output
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub parser: ParserConfig,

    #[validate(nested)]
    pub processing: ProcessingConfig,

    #[validate(nested)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load and validate configuration. `path` overrides `AVWX_CONFIG`, which overrides
    /// `avwx.toml` in the working directory. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        debug!("Loading configuration from {}", path.display());

        let config: AppConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text, without consulting files or the environment.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
