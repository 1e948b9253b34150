use std::path::PathBuf;

use anyhow::Context;
use modmap::{Format, RulesDocument};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The rules document (YAML with `modules` and `rules` keys)
    rules_file: PathBuf,
}

impl Command {
    #[instrument(level = "debug", skip(self), fields(rules_file = %self.rules_file.display()))]
    pub fn run(self, output: Format) -> anyhow::Result<()> {
        let document = RulesDocument::load(&self.rules_file)?;

        super::print_rows(document.resolve(), output).with_context(|| {
            format!("failed to resolve rules in '{}'", self.rules_file.display())
        })?;

        Ok(())
    }
}
