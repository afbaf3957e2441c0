//! Command execution for cpxctl

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use cpx_common::{AggregationMode, RowTable};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::client::{CpxClient, Inventory};
use crate::dashboard;
use crate::live::LiveState;
use crate::poller;
use crate::render;

/// Options for the `ls` command, resolved from the CLI flags.
pub struct LsOptions {
    pub follow: bool,
    pub service: String,
    pub merged: bool,
    pub workers: usize,
}

/// Run `ls`: one full telemetry pass, then either a static table or
/// the live dashboard for the followed service.
pub async fn ls(client: CpxClient, opts: LsOptions) -> Result<()> {
    if opts.follow && opts.service.is_empty() {
        bail!("--follow requires a non-empty --service");
    }

    let client: Arc<dyn Inventory> = Arc::new(client);
    let addresses = client
        .servers()
        .await
        .context("could not list servers from the inventory api")?;
    debug!(servers = addresses.len(), "inventory resolved");

    let mode = if opts.merged {
        AggregationMode::Merged
    } else {
        AggregationMode::Default
    };

    let bar = fetch_progress_bar(addresses.len() as u64);
    let mut table = RowTable::new(mode);
    poller::run_pass(&client, &addresses, opts.workers, &mut table, Some(&bar))
        .await
        .context("telemetry pass failed")?;
    bar.finish_and_clear();

    if opts.follow {
        let Some(state) = LiveState::capture(&mut table, &opts.service) else {
            bail!("no instances found for service {:?}", opts.service);
        };
        dashboard::run(client, state).await
    } else {
        print!("{}", render::render_table(&table, &opts.service));
        Ok(())
    }
}

fn fetch_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:25}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message("Fetching info for servers...");
    bar
}
