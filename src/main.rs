mod cli;
mod error;
mod filter;
mod records;
mod report;
mod reporter;
mod stats;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting genstats - Generation Time Statistics");
    cli.execute()?;

    Ok(())
}
