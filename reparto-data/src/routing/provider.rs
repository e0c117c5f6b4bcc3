//! HTTP routing provider using OSRM's Table and Route APIs.
//!
//! The core routing traits are synchronous. This provider bridges its async
//! HTTP calls to them by blocking on a Tokio runtime internally.

use std::future::Future;
use std::time::Duration;

use log::debug;
use reparto_core::routing::{ensure_square, validate_locations};
use reparto_core::{
    DistanceMatrix, DistanceMatrixProvider, GeometryProvider, Location, RawGeometry, RoutingError,
    UNREACHABLE,
};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::osrm::TableResponse;

/// Error type for [`HttpRoutingProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The configured base URL is not an absolute URL.
    #[error("invalid routing base URL: {0}")]
    BaseUrl(#[source] url::ParseError),
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for routing requests.
pub const DEFAULT_USER_AGENT: &str = "reparto-routing/0.1";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpRoutingProvider`].
#[derive(Debug, Clone)]
pub struct HttpRoutingProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile segment, e.g. `"driving"`.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpRoutingProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpRoutingProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the OSRM profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }
}

/// Distance matrices and road geometry from an OSRM service.
///
/// Each trait call issues exactly one GET request and never retries. The
/// provider owns a Tokio runtime that is reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider uses its own runtime. Inside a
/// multi-threaded runtime (detected via [`Handle::try_current()`]) it uses
/// that runtime's handle with [`tokio::task::block_in_place`]. Inside a
/// `current_thread` runtime it falls back to its own runtime, which can
/// deadlock if the caller's runtime drives IO this request depends on.
pub struct HttpRoutingProvider {
    client: Client,
    config: HttpRoutingProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpRoutingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRoutingProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpRoutingProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRoutingProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: HttpRoutingProviderConfig) -> Result<Self, ProviderBuildError> {
        Url::parse(&config.base_url).map_err(ProviderBuildError::BaseUrl)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Borrow the configuration.
    #[must_use]
    pub fn config(&self) -> &HttpRoutingProviderConfig {
        &self.config
    }

    /// `{base_url}/{service}/v1/{profile}/{lon,lat;...}`
    fn service_url(&self, service: &str, locations: &[Location]) -> String {
        let coords = locations
            .iter()
            .map(|location| format!("{},{}", location.longitude, location.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{service}/v1/{}/{coords}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
        )
    }

    fn build_table_url(&self, locations: &[Location]) -> String {
        format!(
            "{}?annotations=distance",
            self.service_url("table", locations)
        )
    }

    fn build_route_url(&self, path: &[Location]) -> String {
        format!(
            "{}?overview=full&geometries=geojson",
            self.service_url("route", path)
        )
    }

    /// Fetch `url` and return its non-empty body.
    async fn fetch_body(&self, url: &str) -> Result<String, RoutingError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        if body.trim().is_empty() {
            return Err(RoutingError::EmptyResponse {
                url: url.to_owned(),
            });
        }
        Ok(body)
    }

    async fn fetch_matrix_async(
        &self,
        locations: &[Location],
    ) -> Result<DistanceMatrix, RoutingError> {
        let url = self.build_table_url(locations);
        let body = self.fetch_body(&url).await?;
        let table: TableResponse =
            serde_json::from_str(&body).map_err(|err| RoutingError::ParseError {
                message: err.to_string(),
            })?;
        convert_response(table, locations.len())
    }

    /// Convert a reqwest error to a `RoutingError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        if error.is_timeout() {
            return RoutingError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RoutingError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RoutingError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Drive `future` to completion from synchronous code.
    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own runtime.
            _ => self.runtime.block_on(future),
        }
    }
}

/// Convert a Table response into a square matrix of whole metres.
///
/// `null`, negative and non-finite cells become [`UNREACHABLE`].
fn convert_response(
    response: TableResponse,
    expected: usize,
) -> Result<DistanceMatrix, RoutingError> {
    if !response.is_ok() {
        return Err(RoutingError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let distances = response
        .distances
        .ok_or(RoutingError::MissingField { field: "distances" })?;

    let matrix: DistanceMatrix = distances
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| {
                    cell.filter(|&metres| metres >= 0.0 && metres.is_finite())
                        .map_or(UNREACHABLE, |metres| metres.round() as i64)
                })
                .collect()
        })
        .collect();

    ensure_square(&matrix, expected)?;
    Ok(matrix)
}

impl DistanceMatrixProvider for HttpRoutingProvider {
    /// Fetch driving distances between every pair of `locations`.
    fn build_matrix(&self, locations: &[Location]) -> Result<DistanceMatrix, RoutingError> {
        validate_locations(locations)?;
        self.block_on(self.fetch_matrix_async(locations))
    }
}

impl GeometryProvider for HttpRoutingProvider {
    /// Fetch full-overview GeoJSON geometry for `path`, unmodified.
    fn route_geometry(&self, path: &[Location]) -> Result<RawGeometry, RoutingError> {
        validate_locations(path)?;
        let url = self.build_route_url(path);
        self.block_on(self.fetch_body(&url)).map(RawGeometry::new)
    }
}
