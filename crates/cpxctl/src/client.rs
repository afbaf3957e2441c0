//! HTTP client for the CPX inventory API
//!
//! `GET /servers` lists the known instance addresses; `GET /<address>`
//! returns one telemetry record. The `Inventory` trait is the seam the
//! poller and the live scheduler work against, so neither depends on
//! HTTP directly.

use async_trait::async_trait;
use cpx_common::{Address, CpxError, ServiceTelemetry};

/// Default API endpoint when neither the flag nor the environment
/// variable is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8081";

/// Environment variable override for the API endpoint.
pub const API_URL_ENV: &str = "CPX_API_URL";

/// Fetch-by-address access to the inventory.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// All known instance addresses.
    async fn servers(&self) -> Result<Vec<Address>, CpxError>;

    /// One telemetry record for the given address.
    async fn telemetry(&self, address: &str) -> Result<ServiceTelemetry, CpxError>;
}

/// Inventory client backed by the CPX HTTP API.
pub struct CpxClient {
    http: reqwest::Client,
    base_url: String,
}

impl CpxClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        CpxClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the base URL: `--api-url` flag, then $CPX_API_URL,
    /// then the default.
    pub fn resolve_base_url(flag: Option<String>) -> String {
        flag.or_else(|| std::env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CpxError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CpxError::Fetch(format!("{url}: {e}")))?;

        response
            .json::<T>()
            .await
            .map_err(|e| CpxError::Decode(format!("{url}: {e}")))
    }
}

#[async_trait]
impl Inventory for CpxClient {
    async fn servers(&self) -> Result<Vec<Address>, CpxError> {
        self.get_json("servers").await
    }

    async fn telemetry(&self, address: &str) -> Result<ServiceTelemetry, CpxError> {
        self.get_json(address).await
    }
}
