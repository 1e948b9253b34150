use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::render::Format;

/// Configuration for the command line.
///
/// Values set here are defaults; arguments given on the command line take
/// precedence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Versions")]
pub struct Config {
    /// The module registry read by the manifest command when no path is
    /// given.
    pub modules_file: PathBuf,

    /// The project manifest read by the manifest command when no path is
    /// given.
    pub manifest_file: PathBuf,

    /// The output format used when none is given.
    pub output: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modules_file: default_modules_file(),
            manifest_file: default_manifest_file(),
            output: Format::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file is missing or unreadable.
    #[error("failed to read config file '{}'", path.display())]
    Read {
        /// The configuration path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid.
    #[error("failed to parse config file '{}'", path.display())]
    Parse {
        /// The configuration path.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },
}

fn default_modules_file() -> PathBuf {
    PathBuf::from("modules.yaml")
}

fn default_manifest_file() -> PathBuf {
    PathBuf::from("manifest.yaml")
}

/// The serialized versions of the configuration.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_modules_file")]
        modules_file: PathBuf,

        #[serde(default = "default_manifest_file")]
        manifest_file: PathBuf,

        #[serde(default)]
        output: Format,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                modules_file,
                manifest_file,
                output,
            } => Self {
                modules_file,
                manifest_file,
                output,
            },
        }
    }
}
