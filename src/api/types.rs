//! # Wire and Domain Types
//!
//! Two-stage parsing for both upstream APIs:
//!
//! ```text
//! JSON  →  Raw* (lenient serde structs)  →  TryFrom  →  Country / City
//! ```
//!
//! The raw structs accept anything the upstream services might omit.
//! Conversion into the domain types is where required fields are
//! enforced, so malformed entries surface as a `ValidationError`
//! instead of blowing up somewhere in the renderer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Validation Error
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or empty.
    MissingField(&'static str),
    /// A field was present but held an unusable value.
    InvalidField { field: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "missing field `{field}`"),
            ValidationError::InvalidField { field, reason } => {
                write!(f, "invalid field `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Countries (restcountries.com)
// ============================================================================

#[derive(Deserialize, Debug, Default)]
pub struct RawCountryName {
    pub common: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RawFlags {
    pub png: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Currency {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

impl Currency {
    /// "Euro (€)", falling back to the currency code when the name is missing.
    pub fn label(&self, code: &str) -> String {
        let name = self.name.as_deref().unwrap_or(code);
        match self.symbol.as_deref() {
            Some(symbol) => format!("{name} ({symbol})"),
            None => name.to_string(),
        }
    }
}

/// A country entry exactly as restcountries sends it.
#[derive(Deserialize, Debug, Default)]
pub struct RawCountry {
    pub name: Option<RawCountryName>,
    #[serde(default)]
    pub capital: Vec<String>,
    pub population: Option<serde_json::Value>,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    pub flags: Option<RawFlags>,
    /// Emoji flag, e.g. "🇩🇪".
    pub flag: Option<String>,
    pub region: Option<String>,
    #[serde(default)]
    pub currencies: BTreeMap<String, Currency>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub common_name: String,
    pub capitals: Vec<String>,
    pub population: u64,
    pub languages: BTreeMap<String, String>,
    pub flag_image_url: String,
    pub flag_emoji: Option<String>,
    pub region: Option<String>,
    pub currencies: BTreeMap<String, Currency>,
}

impl Country {
    /// The first listed capital, if the country has one.
    pub fn capital(&self) -> Option<&str> {
        self.capitals.first().map(String::as_str)
    }

    /// Language names joined for display, in language-code order.
    pub fn language_names(&self) -> String {
        self.languages
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn currency_labels(&self) -> String {
        self.currencies
            .iter()
            .map(|(code, currency)| currency.label(code))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Lowercased common name, as the cities API expects it.
    pub fn query_name(&self) -> String {
        self.common_name.to_lowercase()
    }
}

impl TryFrom<RawCountry> for Country {
    type Error = ValidationError;

    fn try_from(raw: RawCountry) -> Result<Self, Self::Error> {
        let common_name = raw
            .name
            .and_then(|n| n.common)
            .filter(|n| !n.trim().is_empty())
            .ok_or(ValidationError::MissingField("name.common"))?;

        let population = match raw.population {
            Some(value) => value.as_u64().ok_or_else(|| ValidationError::InvalidField {
                field: "population",
                reason: format!("expected a non-negative integer, got {value}"),
            })?,
            None => return Err(ValidationError::MissingField("population")),
        };

        let flag_image_url = raw
            .flags
            .and_then(|f| f.png)
            .filter(|url| !url.is_empty())
            .ok_or(ValidationError::MissingField("flags.png"))?;

        Ok(Country {
            common_name,
            capitals: raw.capital,
            population,
            languages: raw.languages,
            flag_image_url,
            flag_emoji: raw.flag,
            region: raw.region,
            currencies: raw.currencies,
        })
    }
}

/// Result of validating a full country payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryBatch {
    pub countries: Vec<Country>,
    /// Entries dropped because they failed validation.
    pub skipped: usize,
}

impl CountryBatch {
    /// Validate every raw entry, keeping the ones that pass.
    pub fn from_raw(raw: Vec<RawCountry>) -> Self {
        let mut batch = CountryBatch::default();
        for (index, entry) in raw.into_iter().enumerate() {
            match Country::try_from(entry) {
                Ok(country) => batch.countries.push(country),
                Err(e) => {
                    log::warn!("Skipping country entry #{index}: {e}");
                    batch.skipped += 1;
                }
            }
        }
        batch
    }
}

// ============================================================================
// Cities (countriesnow.space)
// ============================================================================

/// Sort direction. Doubles as the `order` field of the cities request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Asc => "Asc",
            SortOrder::Desc => "Desc",
        }
    }
}

/// Request body for the cities filter endpoint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CityQuery {
    pub order: SortOrder,
    #[serde(rename = "orderBy")]
    pub order_by: String,
    pub country: String,
}

impl CityQuery {
    pub fn for_country(country: &Country, order: SortOrder) -> Self {
        Self {
            order,
            order_by: "population".to_string(),
            country: country.query_name(),
        }
    }
}

/// One demographic sample. `reliability` is sent upstream as `reliabilty`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PopulationCount {
    pub year: i32,
    pub sex: String,
    pub value: String,
    #[serde(rename = "reliabilty")]
    pub reliability: String,
}

/// A population count as countriesnow sends it. Every field is optional
/// and untyped so one odd sample cannot fail the whole payload.
#[derive(Deserialize, Debug, Default)]
pub struct RawPopulationCount {
    pub year: Option<serde_json::Value>,
    pub sex: Option<serde_json::Value>,
    pub value: Option<serde_json::Value>,
    #[serde(rename = "reliabilty")]
    pub reliability: Option<serde_json::Value>,
}

impl TryFrom<RawPopulationCount> for PopulationCount {
    type Error = ValidationError;

    fn try_from(raw: RawPopulationCount) -> Result<Self, Self::Error> {
        let year = match raw.year {
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .and_then(|y| i32::try_from(y).ok())
                .ok_or_else(|| ValidationError::InvalidField {
                    field: "year",
                    reason: format!("out of range: {n}"),
                })?,
            Some(serde_json::Value::String(s)) => {
                s.trim().parse().map_err(|_| ValidationError::InvalidField {
                    field: "year",
                    reason: format!("not numeric: {s:?}"),
                })?
            }
            None | Some(serde_json::Value::Null) => {
                return Err(ValidationError::MissingField("year"));
            }
            Some(other) => {
                return Err(ValidationError::InvalidField {
                    field: "year",
                    reason: format!("unexpected value {other}"),
                });
            }
        };

        // Kept as text; sorting decides later whether it is numeric.
        let value = match raw.value {
            None | Some(serde_json::Value::Null) => {
                return Err(ValidationError::MissingField("value"));
            }
            Some(value) => text(value),
        };

        Ok(PopulationCount {
            year,
            sex: raw.sex.map(text).unwrap_or_default(),
            value,
            reliability: raw.reliability.map(text).unwrap_or_default(),
        })
    }
}

fn text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct RawCity {
    pub city: Option<serde_json::Value>,
    #[serde(rename = "populationCounts", default)]
    pub population_counts: Vec<RawPopulationCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub name: String,
    pub population_counts: Vec<PopulationCount>,
}

/// A city with any malformed population count is rejected as a whole,
/// so the first count (the sort key) is always the one upstream sent first.
impl TryFrom<RawCity> for City {
    type Error = ValidationError;

    fn try_from(raw: RawCity) -> Result<Self, Self::Error> {
        let name = match raw.city {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) => {
                return Err(ValidationError::MissingField("city"));
            }
            Some(other) => {
                return Err(ValidationError::InvalidField {
                    field: "city",
                    reason: format!("expected a string, got {other}"),
                });
            }
        };

        let population_counts = raw
            .population_counts
            .into_iter()
            .enumerate()
            .map(|(index, count)| {
                PopulationCount::try_from(count).map_err(|e| ValidationError::InvalidField {
                    field: "populationCounts",
                    reason: format!("#{index}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(City {
            name,
            population_counts,
        })
    }
}

/// Envelope returned by the cities endpoint. `data` stays untyped until
/// each entry is validated on its own.
#[derive(Deserialize, Debug)]
pub struct CitiesResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

impl CitiesResponse {
    /// Validate every entry, logging and dropping the ones that fail.
    pub fn into_cities(self) -> Vec<City> {
        let mut cities = Vec::with_capacity(self.data.len());
        for (index, entry) in self.data.into_iter().enumerate() {
            let parsed = serde_json::from_value::<RawCity>(entry)
                .map_err(|e| ValidationError::InvalidField {
                    field: "data",
                    reason: e.to_string(),
                })
                .and_then(City::try_from);
            match parsed {
                Ok(city) => cities.push(city),
                Err(e) => log::warn!("Skipping city entry #{index}: {e}"),
            }
        }
        cities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawCountry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_country_parses_full_entry() {
        let country = Country::try_from(raw(json!({
            "name": {"common": "Germany", "official": "Federal Republic of Germany"},
            "capital": ["Berlin"],
            "population": 83240525,
            "languages": {"deu": "German"},
            "flags": {"png": "https://flagcdn.com/w320/de.png"},
            "flag": "🇩🇪",
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}}
        })))
        .unwrap();

        assert_eq!(country.common_name, "Germany");
        assert_eq!(country.capital(), Some("Berlin"));
        assert_eq!(country.population, 83240525);
        assert_eq!(country.language_names(), "German");
        assert_eq!(country.currency_labels(), "Euro (€)");
        assert_eq!(country.flag_emoji.as_deref(), Some("🇩🇪"));
        assert_eq!(country.query_name(), "germany");
    }

    #[test]
    fn test_country_without_capital_or_languages_is_valid() {
        let country = Country::try_from(raw(json!({
            "name": {"common": "Antarctica"},
            "population": 1000,
            "flags": {"png": "https://flagcdn.com/w320/aq.png"}
        })))
        .unwrap();

        assert_eq!(country.capital(), None);
        assert_eq!(country.language_names(), "");
        assert!(country.currencies.is_empty());
    }

    #[test]
    fn test_country_missing_name_is_rejected() {
        let err = Country::try_from(raw(json!({
            "population": 5,
            "flags": {"png": "x.png"}
        })))
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name.common"));
    }

    #[test]
    fn test_country_negative_population_is_rejected() {
        let err = Country::try_from(raw(json!({
            "name": {"common": "Nowhere"},
            "population": -3,
            "flags": {"png": "x.png"}
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidField { field: "population", .. }
        ));
    }

    #[test]
    fn test_country_missing_flag_is_rejected() {
        let err = Country::try_from(raw(json!({
            "name": {"common": "Nowhere"},
            "population": 3
        })))
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("flags.png"));
    }

    #[test]
    fn test_batch_skips_invalid_entries() {
        let batch = CountryBatch::from_raw(vec![
            raw(json!({"name": {"common": "A"}, "population": 1, "flags": {"png": "a.png"}})),
            raw(json!({"name": {"common": ""}, "population": 1, "flags": {"png": "b.png"}})),
            raw(json!({"name": {"common": "C"}, "population": 1, "flags": {"png": "c.png"}})),
        ]);
        assert_eq!(batch.countries.len(), 2);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn test_currency_label_without_symbol_or_name() {
        let currency = Currency { name: None, symbol: None };
        assert_eq!(currency.label("XYZ"), "XYZ");
    }

    #[test]
    fn test_city_query_serializes_upstream_shape() {
        let query = CityQuery {
            order: SortOrder::Desc,
            order_by: "population".to_string(),
            country: "nigeria".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"order": "desc", "orderBy": "population", "country": "nigeria"})
        );
    }

    fn raw_count(value: serde_json::Value) -> RawPopulationCount {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_population_count_keeps_misspelled_field() {
        let count = PopulationCount::try_from(raw_count(json!({
            "year": "2013", "sex": "Both Sexes", "value": "1234", "reliabilty": "Final figure, complete"
        })))
        .unwrap();
        assert_eq!(count.year, 2013);
        assert_eq!(count.reliability, "Final figure, complete");

        let back = serde_json::to_value(&count).unwrap();
        assert!(back.get("reliabilty").is_some());
        assert!(back.get("reliability").is_none());
    }

    #[test]
    fn test_population_value_number_becomes_string() {
        let count = PopulationCount::try_from(raw_count(json!({
            "year": 2020, "sex": "m", "value": 100, "reliabilty": "high"
        })))
        .unwrap();
        assert_eq!(count.value, "100");
    }

    #[test]
    fn test_population_count_missing_value_is_rejected() {
        let err = PopulationCount::try_from(raw_count(json!({"year": 2020}))).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("value"));
    }

    #[test]
    fn test_population_count_bad_year_is_rejected() {
        let err =
            PopulationCount::try_from(raw_count(json!({"year": "soon", "value": "1"}))).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "year", .. }));
    }

    #[test]
    fn test_city_missing_name_is_rejected() {
        let raw: RawCity = serde_json::from_value(json!({"populationCounts": []})).unwrap();
        assert_eq!(
            City::try_from(raw).unwrap_err(),
            ValidationError::MissingField("city")
        );
    }

    #[test]
    fn test_city_with_malformed_count_is_rejected() {
        let raw: RawCity = serde_json::from_value(json!({
            "city": "Beta",
            "populationCounts": [{"year": 2020, "value": "5"}, {"year": 2019}]
        }))
        .unwrap();
        assert!(matches!(
            City::try_from(raw).unwrap_err(),
            ValidationError::InvalidField { field: "populationCounts", .. }
        ));
    }

    #[test]
    fn test_cities_response_keeps_valid_entries() {
        let response: CitiesResponse = serde_json::from_value(json!({
            "error": false,
            "msg": "filtered data",
            "data": [
                {"city": "Alpha", "populationCounts": [{"year": 2020, "value": "100"}]},
                {"city": "Beta", "populationCounts": [{"year": 2020, "sex": "f"}]},
                {"city": 42, "populationCounts": []},
                {"city": "Gamma", "populationCounts": "n/a"},
                "not an object"
            ]
        }))
        .unwrap();

        let cities = response.into_cities();
        let names: Vec<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha"]);
    }
}
