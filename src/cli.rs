use std::path::PathBuf;

mod manifest;
mod rules;
pub mod terminal;

use clap::ArgAction;
use modmap::{Config, Format};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (default: table, or the configured format)
    #[arg(long, value_enum, global = true)]
    output: Option<Format>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = self.load_config()?;
        let output = self.output.unwrap_or(config.output);

        self.command.run(&config, output)
    }

    #[instrument(level = "debug", skip(self))]
    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => {
                let config = Config::load(path)?;
                tracing::debug!(?config, "loaded configuration");
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries the rows
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Print the modules checked out by each rule of a rules document
    Rules(rules::Command),

    /// Print the modules a project develops and consumes
    ///
    /// Develop entries are printed before consume entries.
    Manifest(manifest::Command),
}

impl Command {
    fn run(self, config: &Config, output: Format) -> anyhow::Result<()> {
        match self {
            Self::Rules(command) => command.run(output)?,
            Self::Manifest(command) => command.run(config, output)?,
        }
        Ok(())
    }
}

/// Streams resolved rows to stdout.
///
/// Rows resolved before a failure are flushed before the failure is returned.
fn print_rows<'a>(
    rows: impl Iterator<Item = Result<modmap::ResolvedRow<'a>, modmap::ResolveError>>,
    output: Format,
) -> anyhow::Result<usize> {
    use std::io::{self, BufWriter};

    let stdout = io::stdout();
    let mut writer = modmap::RowWriter::new(BufWriter::new(stdout.lock()), output);
    let count = writer.write_all(rows)?;
    tracing::info!(rows = count, %output, "printed rows");
    Ok(count)
}
