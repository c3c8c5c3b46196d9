use anyhow::Result;
use clap::Parser;

use ado2gh::cli::commands::{self, Command};
use ado2gh::cli::Cli;
use ado2gh::config::MigrationConfig;
use ado2gh::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    MigrationConfig::load_env_file()?;
    let config = MigrationConfig::load()?;
    init_telemetry(cli.command.repository_args().verbose, config.logging.json)?;

    let command = commands::build(cli.command, config);
    tokio::runtime::Runtime::new()?.block_on(async { command.execute().await })
}
