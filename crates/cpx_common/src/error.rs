//! Error taxonomy for cpxctl
//!
//! All three variants are fatal: any occurrence aborts the whole
//! listing, whether it happens during the first pass, inside a fetch
//! worker, or on a live-mode tick. Nothing is retried and no partial
//! table is ever shown.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CpxError {
    /// Network/transport failure reaching the inventory API.
    #[error("could not reach inventory api: {0}")]
    Fetch(String),

    /// The inventory API answered with a body we could not decode.
    #[error("malformed telemetry payload: {0}")]
    Decode(String),

    /// A percentage field was not in the expected "NN%" numeric form.
    #[error("could not parse percentage from {0:?}")]
    Parse(String),
}
