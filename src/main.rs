use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod analysis;
mod api;
mod cli;
mod command;
mod documents;
mod domain;
mod error;
mod mcp;
mod publish;
mod repository;
mod runtime;
mod session;
#[cfg(test)]
mod testing;

use cli::{Cli, Commands};
use runtime::Runtime;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // stdout carries the MCP protocol, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let runtime = Runtime::from_settings(&cli.settings).await?;
            mcp::run_mcp_server(Arc::new(runtime)).await
        }
        Commands::Status => command::run_status(&cli.settings).await,
    }
}
