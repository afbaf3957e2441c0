//! Fan-out/fan-in telemetry pass
//!
//! The dispatcher queues every address into a bounded work channel and
//! closes it; a fixed pool of worker tasks pulls addresses until the
//! queue is exhausted, fetching one telemetry record per address. Each
//! worker holds a clone of the result sender and drops it when it runs
//! out of work, so the collector can simply drain the result channel
//! to closure: exactly N results for N addresses, in arrival order.
//!
//! A pass is all-or-nothing. The first fetch, decode, or parse error
//! aborts the pass; dropping the worker set cancels in-flight fetches.

use std::sync::Arc;

use cpx_common::{Address, CpxError, RowTable, Sample};
use indicatif::ProgressBar;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::debug;

use crate::client::Inventory;

/// Run one complete pass over `addresses` with `workers` concurrent
/// fetchers, folding every sample into `table` as it arrives.
pub async fn run_pass<C>(
    client: &Arc<C>,
    addresses: &[Address],
    workers: usize,
    table: &mut RowTable,
    progress: Option<&ProgressBar>,
) -> Result<(), CpxError>
where
    C: Inventory + ?Sized + 'static,
{
    let total = addresses.len();
    let workers = workers.max(1);
    debug!(addresses = total, workers, "starting telemetry pass");

    // Queue up all the work, then close the channel so workers stop
    // pulling once it drains.
    let (work_tx, work_rx) = mpsc::channel::<Address>(total.max(1));
    for address in addresses {
        // Capacity equals the address count, so this never blocks.
        work_tx
            .send(address.clone())
            .await
            .map_err(|_| CpxError::Fetch("work queue closed early".to_string()))?;
    }
    drop(work_tx);

    let work_rx = Arc::new(Mutex::new(work_rx));
    let (out_tx, mut out_rx) = mpsc::channel::<Result<Sample, CpxError>>(total.max(1));

    let mut pool = JoinSet::new();
    for _ in 0..workers {
        let work_rx = Arc::clone(&work_rx);
        let out_tx = out_tx.clone();
        let client = Arc::clone(client);
        pool.spawn(async move {
            loop {
                let address = { work_rx.lock().await.recv().await };
                let Some(address) = address else { break };

                let result = match client.telemetry(&address).await {
                    Ok(telemetry) => Sample::from_telemetry(&telemetry, &address),
                    Err(e) => Err(e),
                };
                let failed = result.is_err();
                if out_tx.send(result).await.is_err() || failed {
                    break;
                }
            }
        });
    }
    // The collector's view of the result channel closes once every
    // worker has dropped its sender.
    drop(out_tx);

    let mut completed = 0usize;
    while let Some(result) = out_rx.recv().await {
        let sample = result?;
        completed += 1;
        if let Some(bar) = progress {
            bar.inc(1);
        }
        table.fold(&sample);
    }

    if completed != total {
        return Err(CpxError::Fetch(format!(
            "incomplete pass: {completed} of {total} addresses reported"
        )));
    }

    debug!(completed, services = table.service_count(), "pass complete");
    Ok(())
}
