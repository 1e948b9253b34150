use std::path::PathBuf;

use anyhow::Context;
use modmap::{Config, Format, resolve, storage};
use tracing::instrument;

// The first positional argument is the module registry, the second is the
// project manifest. Either falls back to the configured default.
#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The module registry (YAML with a `modules` key) [default: modules.yaml]
    modules_file: Option<PathBuf>,

    /// The project manifest (YAML with `develop` and/or `consume` keys)
    /// [default: manifest.yaml]
    manifest_file: Option<PathBuf>,
}

impl Command {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config, output: Format) -> anyhow::Result<()> {
        let modules_file = self
            .modules_file
            .unwrap_or_else(|| config.modules_file.clone());
        let manifest_file = self
            .manifest_file
            .unwrap_or_else(|| config.manifest_file.clone());

        let registry = storage::load_registry(&modules_file)?;
        let manifest = storage::load_manifest(&manifest_file)?;

        super::print_rows(resolve(&registry, manifest.groups()), output).with_context(|| {
            format!(
                "failed to resolve '{}' against '{}'",
                manifest_file.display(),
                modules_file.display()
            )
        })?;

        Ok(())
    }
}
