//! CPX Control - CLI client for the CPX inventory API

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cpxctl::cli::{Cli, Commands};
use cpxctl::client::CpxClient;
use cpxctl::commands::{self, LsOptions};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr and stay quiet unless RUST_LOG says otherwise,
    // so the table and the alternate screen are never polluted.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = CpxClient::new(CpxClient::resolve_base_url(cli.api_url));

    match cli.command {
        Commands::Ls {
            follow,
            service,
            merged,
            workers,
        } => {
            commands::ls(
                client,
                LsOptions {
                    follow,
                    service: service.unwrap_or_default(),
                    merged,
                    workers: workers.unwrap_or_else(num_cpus::get),
                },
            )
            .await
        }
    }
}
