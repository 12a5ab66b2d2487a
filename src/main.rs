mod cli;
mod commands;
mod config;
mod inventory;
mod mcp;
mod package;
mod page_range;
mod pdf;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout belongs to command output and the MCP transport.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load(cli.config.as_ref())?;

    match cli.command {
        Commands::Mcp => {
            mcp::run_server(config).await?;
        }
        Commands::Inventory { spreadsheet, json } => {
            commands::inventory::run(&spreadsheet, &config, json)?;
        }
        Commands::Plan {
            spreadsheet,
            input_dir,
            json,
        } => {
            commands::plan::run(&spreadsheet, &input_dir, &config, json)?;
        }
        Commands::Run {
            spreadsheet,
            input_dir,
            output_dir,
            json,
            strict,
        } => {
            let options = commands::run::RunOptions { json, strict };
            commands::run::run(&spreadsheet, &input_dir, &output_dir, &config, &options)?;
        }
        Commands::Extract {
            path,
            pages,
            output,
        } => {
            commands::extract::run(&path, &pages, &output)?;
        }
    }

    Ok(())
}
