//! agentsdoc CLI: compile modular rule files into a single agent guide.
//!
//! Builds the composed document, validates the rule repository, and syncs
//! rules from a local upstream documentation checkout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
