use std::fmt;

use async_trait::async_trait;

use super::types::{City, CityQuery, CountryBatch};

/// Errors that can occur while talking to the upstream data services.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The service answered with an error status or an error envelope.
    Api { status: u16, message: String },
    /// The body could not be decoded into the expected shape.
    Parse(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Network(msg) => write!(f, "network error: {msg}"),
            RequestError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            RequestError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for RequestError {}

/// Source of country and city data.
///
/// The TUI only ever holds an `Arc<dyn DataProvider>`, so tests can swap
/// in a stub without touching the network.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Fetches and validates the full country list.
    async fn fetch_countries(&self) -> Result<CountryBatch, RequestError>;

    /// Fetches the cities of one country with their population counts.
    async fn fetch_cities(&self, query: &CityQuery) -> Result<Vec<City>, RequestError>;
}
