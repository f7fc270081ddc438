//! # Filtering and Sorting
//!
//! Pure list derivations used by `update()`. Search is a case-insensitive
//! substring match with no diacritic folding ("cote" does not match
//! "Côte d'Ivoire"). City sorting keys on the first population count.

use std::fmt;

use crate::api::{City, Country, SortOrder};

/// Countries whose common name contains `query`, ignoring case.
pub fn filter_countries<'a>(countries: &'a [Country], query: &str) -> Vec<&'a Country> {
    let needle = query.to_lowercase();
    countries
        .iter()
        .filter(|c| c.common_name.to_lowercase().contains(&needle))
        .collect()
}

/// Cities whose name contains `query`, ignoring case.
///
/// Always filters the full source list, never a previous result.
pub fn filter_cities(cities: &[City], query: &str) -> Vec<City> {
    let needle = query.to_lowercase();
    cities
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// The city has no population counts to sort by.
    NoPopulation(String),
    /// The first population value is not an integer.
    NotNumeric { city: String, value: String },
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::NoPopulation(city) => write!(f, "{city} has no population data"),
            SortError::NotNumeric { city, value } => {
                write!(f, "{city} has a non-numeric population ({value:?})")
            }
        }
    }
}

impl std::error::Error for SortError {}

/// Parses a population value such as "1234567" or "1234567.0".
fn parse_population(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    let integral = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => trimmed,
    };
    integral.parse().ok()
}

/// The value cities are sorted by: the first population count.
pub fn population_key(city: &City) -> Result<u64, SortError> {
    let first = city
        .population_counts
        .first()
        .ok_or_else(|| SortError::NoPopulation(city.name.clone()))?;
    parse_population(&first.value).ok_or_else(|| SortError::NotNumeric {
        city: city.name.clone(),
        value: first.value.clone(),
    })
}

/// Stable sort by population key. Every key is checked before anything
/// moves, so on error the slice is left untouched.
pub fn sort_cities(cities: &mut [City], order: SortOrder) -> Result<(), SortError> {
    let keys = cities
        .iter()
        .map(population_key)
        .collect::<Result<Vec<_>, _>>()?;

    let mut keyed: Vec<(u64, City)> = keys.into_iter().zip(cities.iter().cloned()).collect();
    match order {
        SortOrder::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }
    for (slot, (_, city)) in cities.iter_mut().zip(keyed) {
        *slot = city;
    }
    Ok(())
}
