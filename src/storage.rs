use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

mod manifest;
mod rules;

pub use manifest::{load_manifest, load_registry};
pub use rules::RulesDocument;

/// Errors that can occur when loading a YAML document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document is missing or unreadable.
    #[error("failed to read '{}'", path.display())]
    FileAccess {
        /// The document path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The document is not valid YAML, or does not have the expected shape.
    #[error("failed to parse '{}'", path.display())]
    Parse {
        /// The document path.
        path: PathBuf,
        /// The underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A required top-level key is absent.
    #[error("'{}' has no '{section}' section", path.display())]
    MissingSection {
        /// The document path.
        path: PathBuf,
        /// The missing top-level key.
        section: &'static str,
    },
}

impl LoadError {
    fn missing_section(path: &Path, section: &'static str) -> Self {
        Self::MissingSection {
            path: path.to_path_buf(),
            section,
        }
    }
}

/// Reads a whole document into memory and deserializes it.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "read document");

    serde_yaml::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
