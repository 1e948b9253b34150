//! Command line for module-to-repository mapping reports.

use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::{Cli, terminal::Colorize};

fn main() -> ExitCode {
    match Cli::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error}", "error:".error());
            for cause in error.chain().skip(1) {
                eprintln!("  {}", format!("caused by: {cause}").dim());
            }
            ExitCode::FAILURE
        }
    }
}
