pub mod http;
pub mod provider;
pub mod types;

pub use http::HttpProvider;
pub use provider::{DataProvider, RequestError};
pub use types::{
    City, CityQuery, Country, CountryBatch, Currency, PopulationCount, SortOrder, ValidationError,
};
