//! Shared fake inventory for integration tests
//!
//! Scripted, network-free `Inventory` implementation. Each address
//! carries a queue of telemetry records; a fetch pops the front and
//! the last record repeats once the queue is drained, so live-mode
//! ticks can be scripted per fetch.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use cpx_common::{Address, CpxError, ServiceTelemetry};
use cpxctl::client::Inventory;

#[derive(Default)]
pub struct FakeInventory {
    servers: Vec<Address>,
    responses: Mutex<HashMap<Address, VecDeque<ServiceTelemetry>>>,
    fail_on: Option<Address>,
    pub fetch_log: Mutex<Vec<Address>>,
}

impl FakeInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance with one telemetry record.
    pub fn instance(mut self, address: &str, service: &str, cpu: &str, mem: &str) -> Self {
        self.servers.push(address.to_string());
        self.push(address, service, cpu, mem);
        self
    }

    /// Register an instance whose fetches always fail.
    pub fn failing(mut self, address: &str) -> Self {
        self.servers.push(address.to_string());
        self.fail_on = Some(address.to_string());
        self
    }

    /// Queue a further record for an already-registered instance.
    pub fn push(&self, address: &str, service: &str, cpu: &str, mem: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default()
            .push_back(ServiceTelemetry {
                cpu: cpu.to_string(),
                memory: mem.to_string(),
                service: service.to_string(),
            });
    }

    pub fn fetched_addresses(&self) -> Vec<Address> {
        self.fetch_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Inventory for FakeInventory {
    async fn servers(&self) -> Result<Vec<Address>, CpxError> {
        Ok(self.servers.clone())
    }

    async fn telemetry(&self, address: &str) -> Result<ServiceTelemetry, CpxError> {
        self.fetch_log.lock().unwrap().push(address.to_string());

        if self.fail_on.as_deref() == Some(address) {
            return Err(CpxError::Fetch(format!("{address}: connection refused")));
        }

        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(address)
            .ok_or_else(|| CpxError::Fetch(format!("{address}: unknown address")))?;
        let record = queue
            .pop_front()
            .ok_or_else(|| CpxError::Fetch(format!("{address}: no scripted response")))?;
        if queue.is_empty() {
            queue.push_back(record.clone());
        }
        Ok(record)
    }
}
