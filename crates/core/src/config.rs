use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("model.scale_factor must be greater than 1.0, got {0}")]
    ScaleFactor(f64),
    #[error("model.min_neighbors must be non-negative, got {0}")]
    MinNeighbors(i32),
}

/// Immutable run configuration, loaded once at startup.
///
/// The schema is fixed: unknown keys in the document are rejected
/// rather than silently carried along.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub paths: Paths,
    pub model: ModelParams,
    pub process: ProcessFlags,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Paths {
    pub inputs: InputPaths,
    pub outputs: OutputPaths,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InputPaths {
    pub model_path: PathBuf,
    pub video_path: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputPaths {
    pub video_path: PathBuf,
    pub json_path: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    pub min_size: SizeSpec,
    pub max_size: SizeSpec,
}

/// A width/height pair in pixels, as written in the document.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SizeSpec {
    pub w: i32,
    pub h: i32,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProcessFlags {
    pub if_save_video: bool,
    pub is_save_json: bool,
}

impl Config {
    /// Loads and validates a configuration document.
    ///
    /// No defaulting beyond what the document specifies: a missing
    /// required field is a parse error.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.scale_factor <= 1.0 {
            return Err(ConfigError::ScaleFactor(self.model.scale_factor));
        }
        if self.model.min_neighbors < 0 {
            return Err(ConfigError::MinNeighbors(self.model.min_neighbors));
        }
        Ok(())
    }
}
