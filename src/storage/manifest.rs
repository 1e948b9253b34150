use std::path::Path;

use serde::Deserialize;
use tracing::instrument;

use super::{LoadError, read_document};
use crate::domain::{Manifest, ManifestEntry, ModuleRegistry};

#[derive(Debug, Deserialize)]
struct RawModules {
    modules: Option<ModuleRegistry>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    develop: Option<Vec<ManifestEntry>>,
    consume: Option<Vec<ManifestEntry>>,
}

/// Loads a module registry from the `modules` key of a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if it has no
/// `modules` key.
#[instrument(level = "debug")]
pub fn load_registry(path: &Path) -> Result<ModuleRegistry, LoadError> {
    let raw: RawModules = read_document(path)?;
    let registry = raw
        .modules
        .ok_or_else(|| LoadError::missing_section(path, "modules"))?;

    tracing::debug!(modules = registry.len(), "loaded module registry");
    Ok(registry)
}

/// Loads a project manifest from a YAML file.
///
/// Both the `develop` and `consume` keys are optional; a missing or null
/// section is empty.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
#[instrument(level = "debug")]
pub fn load_manifest(path: &Path) -> Result<Manifest, LoadError> {
    let raw: RawManifest = read_document(path)?;
    let manifest = Manifest::new(
        raw.develop.unwrap_or_default(),
        raw.consume.unwrap_or_default(),
    );

    tracing::debug!(entries = manifest.len(), "loaded manifest");
    Ok(manifest)
}
