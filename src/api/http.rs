//! HTTP provider for the two public services:
//!
//! - restcountries.com: `GET /v3.1/all` for the country list
//! - countriesnow.space: `POST .../population/cities/filter` for cities
//!
//! The cities endpoint is a read exposed as a POST; the body carries the
//! filter. Neither endpoint needs authentication.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::api::provider::{DataProvider, RequestError};
use crate::api::types::{CitiesResponse, City, CityQuery, CountryBatch, RawCountry};

pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1/all";
pub const DEFAULT_CITIES_URL: &str =
    "https://countriesnow.space/api/v0.1/countries/population/cities/filter";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
/// restcountries rejects an unfiltered `/all`, so a field list is sent by default.
pub const DEFAULT_COUNTRIES_FIELDS: &str =
    "name,capital,population,languages,flags,flag,region,currencies";

/// Data provider backed by the public REST services.
pub struct HttpProvider {
    countries_url: String,
    /// Comma-separated `fields=` filter for restcountries (None = omit).
    countries_fields: Option<String>,
    cities_url: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(countries_url: String, cities_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({e}), using defaults");
                reqwest::Client::new()
            });

        Self {
            countries_url,
            countries_fields: None,
            cities_url,
            client,
        }
    }

    /// Restrict the country payload to the given comma-separated fields.
    pub fn with_countries_fields(mut self, fields: Option<String>) -> Self {
        self.countries_fields = fields.filter(|f| !f.trim().is_empty());
        self
    }
}

/// Turns a non-2xx response into `RequestError::Api`, keeping the body for context.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RequestError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("Upstream API error: {} - {}", status, message);
    Err(RequestError::Api { status, message })
}

#[async_trait]
impl DataProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_countries(&self) -> Result<CountryBatch, RequestError> {
        info!("Fetching country list from {}", self.countries_url);

        let mut request = self.client.get(&self.countries_url);
        if let Some(fields) = &self.countries_fields {
            request = request.query(&[("fields", fields.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;
        debug!("Countries response status: {}", response.status());
        let response = check_status(response).await?;

        let raw: Vec<RawCountry> = response
            .json()
            .await
            .map_err(|e| RequestError::Parse(e.to_string()))?;

        let batch = CountryBatch::from_raw(raw);
        info!(
            "Country list loaded: {} valid, {} skipped",
            batch.countries.len(),
            batch.skipped
        );
        Ok(batch)
    }

    async fn fetch_cities(&self, query: &CityQuery) -> Result<Vec<City>, RequestError> {
        info!(
            "Fetching cities: country={}, order={:?}",
            query.country, query.order
        );

        let response = self
            .client
            .post(&self.cities_url)
            .json(query)
            .send()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;
        debug!("Cities response status: {}", response.status());
        let response = check_status(response).await?;

        let envelope: CitiesResponse = response
            .json()
            .await
            .map_err(|e| RequestError::Parse(e.to_string()))?;

        if envelope.error {
            warn!("Cities API reported an error: {}", envelope.msg);
            return Err(RequestError::Api {
                status: 200,
                message: envelope.msg,
            });
        }

        let received = envelope.data.len();
        let cities = envelope.into_cities();
        if cities.len() < received {
            warn!(
                "Skipped {} malformed city entries for {}",
                received - cities.len(),
                query.country
            );
        }
        info!("Cities loaded for {}: {}", query.country, cities.len());
        Ok(cities)
    }
}
