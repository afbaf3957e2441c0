//! Telemetry wire types and percentage parsing

use serde::{Deserialize, Serialize};

use crate::error::CpxError;

/// Opaque identifier for one service instance (an IP in practice).
pub type Address = String;

/// Raw telemetry record returned by `GET /<address>`.
///
/// The inventory API capitalizes its JSON keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTelemetry {
    #[serde(rename = "Cpu")]
    pub cpu: String,
    #[serde(rename = "Memory")]
    pub memory: String,
    #[serde(rename = "Service")]
    pub service: String,
}

/// One parsed fetch result: the unit the aggregator folds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub service: String,
    pub cpu_pct: i32,
    pub mem_pct: i32,
    pub source: Address,
}

impl Sample {
    /// Parse the "NN%" fields of a telemetry record. Strict: a
    /// non-numeric percentage is a fatal [`CpxError::Parse`].
    pub fn from_telemetry(telemetry: &ServiceTelemetry, source: &str) -> Result<Self, CpxError> {
        Ok(Sample {
            service: telemetry.service.clone(),
            cpu_pct: parse_percent(&telemetry.cpu)?,
            mem_pct: parse_percent(&telemetry.memory)?,
            source: source.to_string(),
        })
    }
}

/// Parse `"NN%"` into an integer. Everything before the first `%` must
/// be a plain integer; no clamping of out-of-range values.
pub fn parse_percent(text: &str) -> Result<i32, CpxError> {
    let digits = text.split('%').next().unwrap_or(text);
    digits
        .parse::<i32>()
        .map_err(|_| CpxError::Parse(text.to_string()))
}
