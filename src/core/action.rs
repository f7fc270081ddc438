//! # Actions
//!
//! Everything that can happen in the app becomes an `Action`.
//! User types in the search box? That's `Action::Search(text)`.
//! The cities API responds? That's `Action::CitiesLoaded { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing any I/O the
//! adapter should perform. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::api::{City, CityQuery, Country, CountryBatch, RequestError, SortOrder};
use crate::core::filter::{filter_cities, sort_cities};
use crate::core::state::{
    App, CITY_FETCH_ERROR, COUNTRY_FETCH_ERROR, CitySection, CountryListStatus, RequestId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// App start: load the country list.
    Start,
    CountriesLoaded(Result<CountryBatch, RequestError>),
    Search(String),
    SelectCountry(Country),
    /// Return from the detail card to the list.
    Deselect,
    /// The "See Cities Details" / "Hide Cities" button.
    ToggleCities,
    CitiesLoaded {
        request: RequestId,
        result: Result<Vec<City>, RequestError>,
    },
    SearchCities(String),
    SetSort(SortOrder),
    Quit,
}

/// I/O the adapter must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchCountries,
    /// Start the one-time fade-in of the country list.
    StartFadeIn,
    FetchCities { request: RequestId, query: CityQuery },
    /// Abort the in-flight city request, if any.
    CancelCities,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Start => {
            app.error = None;
            app.country_list = CountryListStatus::Loading;
            app.status_message = String::from("Loading countries...");
            Effect::FetchCountries
        }
        Action::CountriesLoaded(Ok(batch)) => {
            info!(
                "Countries loaded: {} ({} skipped)",
                batch.countries.len(),
                batch.skipped
            );
            app.status_message = if batch.skipped > 0 {
                format!(
                    "{} countries ({} malformed entries skipped)",
                    batch.countries.len(),
                    batch.skipped
                )
            } else {
                format!("{} countries", batch.countries.len())
            };
            app.countries = batch.countries;
            app.country_list = CountryListStatus::Loaded;
            Effect::StartFadeIn
        }
        Action::CountriesLoaded(Err(e)) => {
            warn!("Country list fetch failed: {}", e);
            app.countries.clear();
            app.country_list = CountryListStatus::Failed;
            app.error = Some(COUNTRY_FETCH_ERROR.to_string());
            app.status_message = String::new();
            Effect::None
        }
        Action::Search(text) => {
            let effect = reset_selection(app, None);
            app.search_text = text;
            effect
        }
        Action::SelectCountry(country) => {
            info!("Selected country: {}", country.common_name);
            reset_selection(app, Some(country))
        }
        Action::Deselect => reset_selection(app, None),
        Action::ToggleCities => {
            app.error = None;
            let Some(country) = &app.selected else {
                debug!("ToggleCities ignored: no country selected");
                return Effect::None;
            };
            if app.city_section.is_open() {
                let was_loading = app.pending_request().is_some();
                clear_cities(app);
                app.city_section = CitySection::Hidden;
                if was_loading { Effect::CancelCities } else { Effect::None }
            } else {
                let request = app.next_request_id;
                app.next_request_id += 1;
                let query = CityQuery::for_country(country, app.sort_order);
                app.city_section = CitySection::Loading(request);
                Effect::FetchCities { request, query }
            }
        }
        Action::CitiesLoaded { request, result } => {
            if app.pending_request() != Some(request) {
                debug!("Discarding stale city response (request {})", request);
                return Effect::None;
            }
            match result {
                Ok(cities) => {
                    info!("Received {} cities (request {})", cities.len(), request);
                    app.cities = cities;
                    app.city_section = CitySection::Shown;
                    refresh_filtered_cities(app);
                }
                Err(e) => {
                    warn!("City fetch failed (request {}): {}", request, e);
                    app.error = Some(CITY_FETCH_ERROR.to_string());
                    app.city_section = CitySection::Error;
                }
            }
            Effect::None
        }
        Action::SearchCities(text) => {
            app.error = None;
            app.city_search_text = text;
            refresh_filtered_cities(app);
            Effect::None
        }
        Action::SetSort(order) => {
            app.error = None;
            app.sort_order = order;
            if let Err(e) = sort_cities(&mut app.filtered_cities, order) {
                report_sort_error(app, &e);
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Replace the selection and drop every piece of city state tied to it.
fn reset_selection(app: &mut App, country: Option<Country>) -> Effect {
    let was_loading = app.pending_request().is_some();
    app.error = None;
    clear_cities(app);
    app.city_search_text.clear();
    app.city_section = CitySection::Idle;
    app.selected = country;
    if was_loading { Effect::CancelCities } else { Effect::None }
}

fn clear_cities(app: &mut App) {
    app.cities.clear();
    app.filtered_cities.clear();
}

/// Re-derive `filtered_cities` from the full list: filter, then sort.
fn refresh_filtered_cities(app: &mut App) {
    app.filtered_cities = filter_cities(&app.cities, &app.city_search_text);
    if let Err(e) = sort_cities(&mut app.filtered_cities, app.sort_order) {
        report_sort_error(app, &e);
    }
}

fn report_sort_error(app: &mut App, e: &crate::core::filter::SortError) {
    warn!("Sorting cities failed: {}", e);
    app.error = Some(format!("Could not sort cities: {e}"));
}
