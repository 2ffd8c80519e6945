//! Questform CLI: repair model-extracted questionnaire JSON into a
//! hosting-service form definition.
//!
//! Reads the extractor's raw output, validates and fixes it, and prints the
//! result or the create-form payload as JSON on stdout. Logs go to stderr.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
