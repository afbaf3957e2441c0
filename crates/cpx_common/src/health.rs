//! Health classification for service instances

use std::fmt;

/// CPU percentage above which an instance is considered unhealthy.
pub const CPU_UNHEALTHY_ABOVE: i32 = 90;

/// Memory percentage above which an instance is considered unhealthy.
pub const MEM_UNHEALTHY_ABOVE: i32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Unhealthy => write!(f, "Unhealthy"),
        }
    }
}

/// Classify one instance from its CPU and memory percentages.
/// Thresholds are fixed: above 90% CPU or above 80% memory is
/// unhealthy, both boundaries inclusive on the healthy side.
pub fn classify(cpu_pct: i32, mem_pct: i32) -> HealthStatus {
    if cpu_pct > CPU_UNHEALTHY_ABOVE || mem_pct > MEM_UNHEALTHY_ABOVE {
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Healthy
    }
}
