//! Fixed-length circular buffer for live-mode chart history

/// Number of chart slots kept per metric.
pub const CHART_SLOTS: usize = 80;

/// Circular metric history. The buffer is pre-filled with zeros so a
/// chart can always draw a full window; the write index wraps and
/// overwrites the oldest entry once all slots have been used.
#[derive(Debug, Clone)]
pub struct MetricHistory {
    slots: Vec<u64>,
    next: usize,
}

impl MetricHistory {
    pub fn new() -> Self {
        Self::with_capacity(CHART_SLOTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MetricHistory {
            slots: vec![0; capacity.max(1)],
            next: 0,
        }
    }

    /// Record one tick's value.
    pub fn record(&mut self, value: u64) {
        let len = self.slots.len();
        self.slots[self.next % len] = value;
        self.next = (self.next + 1) % len;
    }

    /// Raw slot view, suitable for a sparkline.
    pub fn slots(&self) -> &[u64] {
        &self.slots
    }
}

impl Default for MetricHistory {
    fn default() -> Self {
        Self::new()
    }
}
