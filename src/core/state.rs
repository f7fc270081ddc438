//! # Application State
//!
//! Core view-model for the country browser. This module contains domain
//! state only - no TUI-specific types. Presentation state (cursor rows,
//! scroll offsets, fade animation) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── search_text: String             // country search box
//! ├── countries: Vec<Country>         // full list, fetched once
//! ├── country_list: CountryListStatus // Loading / Loaded / Failed
//! ├── selected: Option<Country>       // the country shown in the card
//! ├── cities: Vec<City>               // full city list for `selected`
//! ├── filtered_cities: Vec<City>      // derived: filter + sort of `cities`
//! ├── city_search_text: String        // city search box
//! ├── sort_order: SortOrder           // Asc / Desc
//! ├── city_section: CitySection       // Idle / Loading / Shown / Hidden / Error
//! ├── error: Option<String>           // single visible error line
//! └── status_message: String          // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::api::{City, Country, SortOrder};
use crate::core::filter::filter_countries;

pub const COUNTRY_FETCH_ERROR: &str = "Failed to fetch country list. Please try again.";
pub const CITY_FETCH_ERROR: &str = "No Cities found on the API";

pub const SHOW_CITIES_LABEL: &str = "See Cities Details";
pub const HIDE_CITIES_LABEL: &str = "Hide Cities";

/// Identifies one city request so late responses can be discarded.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryListStatus {
    Loading,
    Loaded,
    Failed,
}

/// Lifecycle of the city section for the selected country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitySection {
    /// Nothing requested yet for this country.
    Idle,
    /// A request is in flight.
    Loading(RequestId),
    /// Cities are listed.
    Shown,
    /// The user closed the section after opening it.
    Hidden,
    /// The last request failed; the section stays open and empty.
    Error,
}

impl CitySection {
    /// Whether the section occupies screen space (and the button reads "Hide Cities").
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            CitySection::Loading(_) | CitySection::Shown | CitySection::Error
        )
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.is_open() {
            HIDE_CITIES_LABEL
        } else {
            SHOW_CITIES_LABEL
        }
    }
}

pub struct App {
    pub search_text: String,
    pub countries: Vec<Country>,
    pub country_list: CountryListStatus,
    pub selected: Option<Country>,
    pub cities: Vec<City>,
    pub filtered_cities: Vec<City>,
    pub city_search_text: String,
    pub sort_order: SortOrder,
    pub city_section: CitySection,
    pub error: Option<String>,
    pub status_message: String,
    pub next_request_id: RequestId,
}

impl App {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            search_text: String::new(),
            countries: Vec::new(),
            country_list: CountryListStatus::Loading,
            selected: None,
            cities: Vec::new(),
            filtered_cities: Vec::new(),
            city_search_text: String::new(),
            sort_order,
            city_section: CitySection::Idle,
            error: None,
            status_message: String::from("Loading countries..."),
            next_request_id: 1,
        }
    }

    /// Countries matching the current search text.
    pub fn visible_countries(&self) -> Vec<&Country> {
        filter_countries(&self.countries, &self.search_text)
    }

    pub fn toggle_label(&self) -> &'static str {
        self.city_section.toggle_label()
    }

    pub fn cities_visible(&self) -> bool {
        self.city_section.is_open()
    }

    /// The id of the in-flight city request, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        match self.city_section {
            CitySection::Loading(id) => Some(id),
            _ => None,
        }
    }
}
