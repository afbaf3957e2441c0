//! CPX Control - CLI client for the CPX inventory API
//!
//! Polls every known service instance for CPU/memory telemetry and
//! presents the fleet as a static table or a live dashboard.

pub mod cli;
pub mod client;
pub mod commands;
pub mod dashboard;
pub mod live;
pub mod poller;
pub mod render;
