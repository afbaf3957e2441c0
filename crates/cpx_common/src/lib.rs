//! CPX Common - Shared types and the aggregation core for cpxctl
//!
//! Everything in this crate is independent of HTTP and the terminal:
//! the telemetry wire types, the health classifier, the row table the
//! collector folds samples into, and the chart history buffer.

pub mod error;
pub mod health;
pub mod history;
pub mod rows;
pub mod telemetry;

pub use error::CpxError;
pub use health::{classify, HealthStatus};
pub use history::MetricHistory;
pub use rows::{AggregationMode, DefaultRow, MergedRow, RowSet, RowTable};
pub use telemetry::{Address, Sample, ServiceTelemetry};
