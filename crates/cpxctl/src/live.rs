//! Live-mode state and per-tick refresh
//!
//! After the first pass, the address set of the followed service is
//! captured once; every tick re-fetches telemetry for exactly that
//! set and folds it into the rows in place. Default mode overwrites
//! each row by address. Merged mode recomputes the average over the
//! whole replica set from scratch each tick (no cross-tick folding)
//! and appends the result to the chart history.
//!
//! The refresh is driven from the dashboard's event loop, which owns
//! this state exclusively; there is no shared mutation across tasks.

use cpx_common::{Address, CpxError, MetricHistory, RowSet, RowTable, Sample};
use tracing::debug;

use crate::client::Inventory;

/// State of one followed service.
pub struct LiveState {
    pub service: String,
    addresses: Vec<Address>,
    pub rows: RowSet,
    pub cpu_history: MetricHistory,
    pub mem_history: MetricHistory,
}

impl LiveState {
    /// Capture the followed service out of a completed first pass.
    /// Returns `None` when the service was not present in the pass.
    pub fn capture(table: &mut RowTable, service: &str) -> Option<Self> {
        let rows = table.take(service)?;
        let addresses = rows.addresses();
        Some(LiveState {
            service: service.to_string(),
            addresses,
            rows,
            cpu_history: MetricHistory::new(),
            mem_history: MetricHistory::new(),
        })
    }

    /// The fixed replica set captured after the first pass.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// One tick: re-fetch every captured address and fold in place.
    /// Any fetch or parse error is fatal to the whole run.
    pub async fn refresh<C>(&mut self, client: &C) -> Result<(), CpxError>
    where
        C: Inventory + ?Sized,
    {
        match &mut self.rows {
            RowSet::Default(rows) => {
                for address in &self.addresses {
                    let telemetry = client.telemetry(address).await?;
                    let sample = Sample::from_telemetry(&telemetry, address)?;
                    if let Some(row) = rows.iter_mut().find(|r| &r.address == address) {
                        row.overwrite(&sample);
                    }
                }
            }
            RowSet::Merged(row) => {
                // Fresh full-set recomputation, not an incremental fold
                // onto the previous tick's average.
                let mut cpu_sum = 0i32;
                let mut mem_sum = 0i32;
                for address in &self.addresses {
                    let telemetry = client.telemetry(address).await?;
                    let sample = Sample::from_telemetry(&telemetry, address)?;
                    cpu_sum += sample.cpu_pct;
                    mem_sum += sample.mem_pct;
                }
                let replicas = self.addresses.len().max(1) as i32;
                row.cpu_avg = cpu_sum / replicas;
                row.mem_avg = mem_sum / replicas;
                self.cpu_history.record(row.cpu_avg.max(0) as u64);
                self.mem_history.record(row.mem_avg.max(0) as u64);
            }
        }
        debug!(service = %self.service, replicas = self.addresses.len(), "live refresh tick");
        Ok(())
    }
}
