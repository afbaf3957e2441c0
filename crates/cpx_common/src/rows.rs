//! Row table and aggregation
//!
//! A `RowTable` is created empty at the start of a pass and mutated
//! only by `fold` as samples arrive. In `Default` mode each sample
//! becomes its own row, in arrival order. In `Merged` mode all
//! instances of a service collapse into one row holding running
//! averages; raw samples are discarded after folding.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::health::{classify, HealthStatus};
use crate::telemetry::{Address, Sample};

/// Whether instances of the same service are listed individually or
/// collapsed into one averaged row. Fixed for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    Default,
    Merged,
}

/// One instance, retained verbatim with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRow {
    pub address: Address,
    pub service: String,
    pub status: HealthStatus,
    pub cpu_pct: i32,
    pub mem_pct: i32,
}

impl DefaultRow {
    pub fn from_sample(sample: &Sample) -> Self {
        DefaultRow {
            address: sample.source.clone(),
            service: sample.service.clone(),
            status: classify(sample.cpu_pct, sample.mem_pct),
            cpu_pct: sample.cpu_pct,
            mem_pct: sample.mem_pct,
        }
    }

    /// Overwrite the metrics of this row in place (live mode).
    pub fn overwrite(&mut self, sample: &Sample) {
        self.cpu_pct = sample.cpu_pct;
        self.mem_pct = sample.mem_pct;
        self.status = classify(sample.cpu_pct, sample.mem_pct);
    }
}

/// All instances of one service collapsed into a single record.
///
/// `cpu_avg`/`mem_avg` are running integer-truncated averages rebuilt
/// from the stored average and the old replica count; the truncation
/// drift this accumulates is part of the documented output format.
/// Invariant: `replica_count == addresses.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub service: String,
    pub addresses: Vec<Address>,
    pub cpu_avg: i32,
    pub mem_avg: i32,
    pub replica_count: i32,
}

impl MergedRow {
    pub fn from_sample(sample: &Sample) -> Self {
        MergedRow {
            service: sample.service.clone(),
            addresses: vec![sample.source.clone()],
            cpu_avg: sample.cpu_pct,
            mem_avg: sample.mem_pct,
            replica_count: 1,
        }
    }

    /// Fold one more replica in: `avg' = ((avg * n) + value) / (n + 1)`
    /// with integer division, using the replica count before the append.
    pub fn fold(&mut self, sample: &Sample) {
        let n = self.addresses.len() as i32;
        self.cpu_avg = ((self.cpu_avg * n) + sample.cpu_pct) / (n + 1);
        self.mem_avg = ((self.mem_avg * n) + sample.mem_pct) / (n + 1);
        self.addresses.push(sample.source.clone());
        self.replica_count += 1;
    }
}

/// The per-service shape, decided once per invocation by the mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSet {
    Default(Vec<DefaultRow>),
    Merged(MergedRow),
}

impl RowSet {
    /// The addresses contributing to this row set, in insertion order.
    pub fn addresses(&self) -> Vec<Address> {
        match self {
            RowSet::Default(rows) => rows.iter().map(|r| r.address.clone()).collect(),
            RowSet::Merged(row) => row.addresses.clone(),
        }
    }
}

/// Aggregated state of one pass, keyed by service name.
#[derive(Debug, Clone)]
pub struct RowTable {
    mode: AggregationMode,
    rows: HashMap<String, RowSet>,
}

impl RowTable {
    pub fn new(mode: AggregationMode) -> Self {
        RowTable {
            mode,
            rows: HashMap::new(),
        }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct services seen so far.
    pub fn service_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, service: &str) -> Option<&RowSet> {
        self.rows.get(service)
    }

    /// Remove and return the row set for one service (live mode
    /// captures its target this way after the first pass).
    pub fn take(&mut self, service: &str) -> Option<RowSet> {
        self.rows.remove(service)
    }

    /// Services in sorted order, for deterministic rendering.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &RowSet)> {
        let mut keys: Vec<&String> = self.rows.keys().collect();
        keys.sort();
        keys.into_iter().map(move |k| (k.as_str(), &self.rows[k]))
    }

    /// Fold one sample into the table under its service key.
    pub fn fold(&mut self, sample: &Sample) {
        match self.rows.entry(sample.service.clone()) {
            Entry::Occupied(mut entry) => match entry.get_mut() {
                RowSet::Default(rows) => rows.push(DefaultRow::from_sample(sample)),
                RowSet::Merged(row) => row.fold(sample),
            },
            Entry::Vacant(entry) => {
                entry.insert(match self.mode {
                    AggregationMode::Default => {
                        RowSet::Default(vec![DefaultRow::from_sample(sample)])
                    }
                    AggregationMode::Merged => RowSet::Merged(MergedRow::from_sample(sample)),
                });
            }
        }
    }
}
