//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap. Keeps argument parsing
//! separate from execution logic.

use clap::{Parser, Subcommand};

/// CPX Control CLI
#[derive(Parser)]
#[command(name = "cpxctl")]
#[command(about = "CPX Control - service fleet telemetry at a glance", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the inventory API (overrides $CPX_API_URL and the default)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Lists the running services in a table format
    ///
    /// One row per instance by default; with --merged all instances of
    /// a service are collapsed into a single averaged row.
    Ls {
        /// Follow the output for the service specified with --service
        #[arg(short, long, requires = "service")]
        follow: bool,

        /// Service for which to list details; all services when omitted
        #[arg(short, long)]
        service: Option<String>,

        /// Merge all instances of a service into one averaged row
        #[arg(short, long)]
        merged: bool,

        /// Concurrent fetch workers; defaults to the number of CPUs
        #[arg(long)]
        workers: Option<usize>,
    },
}
