//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    City, CityQuery, Country, CountryBatch, DataProvider, PopulationCount, RequestError, SortOrder,
};
use crate::core::action::{Action, update};
use crate::core::state::App;

/// A minimal valid country.
pub fn country(name: &str) -> Country {
    Country {
        common_name: name.to_string(),
        capitals: vec![format!("{name} City")],
        population: 1_000_000,
        languages: BTreeMap::from([("eng".to_string(), "English".to_string())]),
        flag_image_url: format!("https://flags.test/{}.png", name.to_lowercase()),
        flag_emoji: None,
        region: None,
        currencies: BTreeMap::new(),
    }
}

/// A city with a single population count.
pub fn city(name: &str, value: &str) -> City {
    City {
        name: name.to_string(),
        population_counts: vec![PopulationCount {
            year: 2020,
            sex: "Both Sexes".to_string(),
            value: value.to_string(),
            reliability: "Final figure".to_string(),
        }],
    }
}

/// Alpha (100) and Beta (50), in that order.
pub fn testland_cities() -> Vec<City> {
    vec![city("Alpha", "100"), city("Beta", "50")]
}

/// An App whose country list has already loaded.
pub fn loaded_app(names: &[&str]) -> App {
    let mut app = App::new(SortOrder::Asc);
    let batch = CountryBatch {
        countries: names.iter().map(|n| country(n)).collect(),
        skipped: 0,
    };
    update(&mut app, Action::CountriesLoaded(Ok(batch)));
    app
}

/// Provider returning canned data and recording city queries.
pub struct StubProvider {
    pub countries: Result<CountryBatch, RequestError>,
    pub cities: Result<Vec<City>, RequestError>,
    pub queries: Mutex<Vec<CityQuery>>,
}

impl StubProvider {
    pub fn new(countries: Vec<Country>, cities: Vec<City>) -> Self {
        Self {
            countries: Ok(CountryBatch { countries, skipped: 0 }),
            cities: Ok(cities),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DataProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_countries(&self) -> Result<CountryBatch, RequestError> {
        self.countries.clone()
    }

    async fn fetch_cities(&self, query: &CityQuery) -> Result<Vec<City>, RequestError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        self.cities.clone()
    }
}
