//! HTTP client for the traffic backend.
//!
//! Every fetch is a single GET. A failed fetch (transport error, non-success
//! status or undecodable body) is logged and replaced by a fixed fallback
//! dataset; callers always get data back. The [`FetchOrigin`] on the result
//! says which one they got.

mod fallback;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::Result;
use crate::model::{DensityReading, RawViolation};
use crate::reports::{fallback_report, ReportPoint, TimeFrame};

pub use fallback::{fallback_density_readings, fallback_violations};

/// Density listing endpoint.
pub const DENSITY_PATH: &str = "/TrafficControlSystem/TrafficDensity/GetAllTrafficDensitys";

/// Violation listing endpoint.
pub const VIOLATIONS_PATH: &str = "/TrafficControlSystem/Violation/GetAllViolations";

/// Report endpoint; takes a `timeFrame` query parameter.
pub const REPORTS_PATH: &str = "/api/reports";

/// Why a fetch fell back.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never got a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Requested URL.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("{url} returned {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status received.
        status: StatusCode,
    },

    /// The body was not the expected JSON.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },
}

/// Where fetched data came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum FetchOrigin {
    /// Straight from the backend.
    Live,
    /// The backend failed; this is the fixed substitute.
    Fallback {
        /// The failure that caused the substitution.
        reason: String,
    },
}

/// Data plus its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fetched<T> {
    /// The data.
    pub data: T,
    /// Where it came from.
    #[serde(flatten)]
    pub origin: FetchOrigin,
}

impl<T> Fetched<T> {
    /// Wrap live data.
    pub fn live(data: T) -> Self {
        Self {
            data,
            origin: FetchOrigin::Live,
        }
    }

    /// Wrap fallback data with the failure reason.
    pub fn fallback(data: T, reason: impl Into<String>) -> Self {
        Self {
            data,
            origin: FetchOrigin::Fallback {
                reason: reason.into(),
            },
        }
    }

    /// True if this is substitute data.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, FetchOrigin::Fallback { .. })
    }

    /// Transform the data, keeping the origin.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            origin: self.origin,
        }
    }
}

/// Source of traffic data.
///
/// [`ApiClient`] is the HTTP implementation; anything else that can produce
/// the same records (a fixture, a replay) can drive the dashboard too.
#[async_trait]
pub trait TrafficApi: Send + Sync {
    /// All density readings.
    async fn fetch_density_readings(&self) -> Fetched<Vec<DensityReading>>;

    /// All violations, unmapped and unfiltered.
    async fn fetch_violations(&self) -> Fetched<Vec<RawViolation>>;

    /// Report points for a period.
    async fn fetch_report(&self, time_frame: TimeFrame) -> Fetched<Vec<ReportPoint>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DensityEnvelope {
    #[serde(default)]
    traffic_densitys: Option<Vec<DensityReading>>,
    #[serde(default)]
    status: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ViolationEnvelope {
    #[serde(default)]
    violations: Option<Vec<RawViolation>>,
}

#[derive(Debug, Deserialize)]
struct ReportEnvelope {
    #[serde(default)]
    data: Option<Vec<ReportPoint>>,
}

/// HTTP client for the traffic backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, "API client created");
        Ok(Self { http, base_url })
    }

    /// Create a client from configuration. The base URL is resolved here,
    /// once.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url(), config.api.request_timeout())
    }

    /// The resolved base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<T, FetchError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }
}

#[async_trait]
impl TrafficApi for ApiClient {
    async fn fetch_density_readings(&self) -> Fetched<Vec<DensityReading>> {
        match self.get_json::<DensityEnvelope>(DENSITY_PATH, &[]).await {
            Ok(envelope) => {
                debug!(
                    status = envelope.status,
                    message = %envelope.message,
                    "Density response received"
                );
                Fetched::live(envelope.traffic_densitys.unwrap_or_default())
            }
            Err(e) => {
                error!(error = %e, "Error fetching traffic data, using fallback readings");
                Fetched::fallback(fallback_density_readings(Utc::now()), e.to_string())
            }
        }
    }

    async fn fetch_violations(&self) -> Fetched<Vec<RawViolation>> {
        match self.get_json::<ViolationEnvelope>(VIOLATIONS_PATH, &[]).await {
            Ok(envelope) => {
                let violations = envelope.violations.unwrap_or_default();
                debug!(count = violations.len(), "Violations received");
                Fetched::live(violations)
            }
            Err(e) => {
                error!(error = %e, "Error fetching violations, using fallback records");
                Fetched::fallback(fallback_violations(), e.to_string())
            }
        }
    }

    async fn fetch_report(&self, time_frame: TimeFrame) -> Fetched<Vec<ReportPoint>> {
        let query = [("timeFrame", time_frame.as_str())];
        match self.get_json::<ReportEnvelope>(REPORTS_PATH, &query).await {
            Ok(envelope) => Fetched::live(envelope.data.unwrap_or_default()),
            Err(e) => {
                error!(
                    error = %e,
                    %time_frame,
                    "Error fetching report data, using fallback report"
                );
                Fetched::fallback(fallback_report(time_frame), e.to_string())
            }
        }
    }
}
