mod cli;
mod config;
mod main_lib;
mod runner;

use clap::Parser;
use cli::Cli;
use config::Config;
use main_lib::{build_state, init_tracing};
use runner::CommandRunner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(db_path) = cli.db {
        config.db_path = db_path;
    }
    config.sample_data |= cli.sample_data;

    init_tracing(config.log_format);
    let state = build_state(&config)?;

    let output = CommandRunner::new(state).run(cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
