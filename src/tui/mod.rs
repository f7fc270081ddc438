//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard/mouse events into `core::Action` values, and
//! carries out the `Effect`s that `update()` returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Requests
//!
//! Network calls run as tokio tasks and report back by sending an
//! `Action` over a std mpsc channel drained once per loop iteration.
//! The city task's `AbortHandle` is kept so a hide, a new selection or
//! quitting can abort it; a response that still slips through carries a
//! stale `RequestId` and is dropped by `update()`.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (fade-in, spinner while loading): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::api::{CityQuery, DataProvider, HttpProvider, SortOrder};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, CountryListStatus, RequestId};
use crate::tui::component::EventHandler;
use crate::tui::components::country_list::hit_test_row;
use crate::tui::components::search_box::apply_edit;
use crate::tui::components::{CityPanelState, CountryListEvent, CountryListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const FADE_DURATION: Duration = Duration::from_millis(1000);

/// One-time fade-in of the country list after it loads.
pub struct FadeIn {
    started: Option<Instant>,
    duration: Duration,
}

impl FadeIn {
    pub fn new(duration: Duration) -> Self {
        Self {
            started: None,
            duration,
        }
    }

    /// Starts the fade. Later calls are ignored.
    pub fn start(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    pub fn progress_at(&self, now: Instant) -> f32 {
        match self.started {
            None => 0.0,
            Some(_) if self.duration.is_zero() => 1.0,
            Some(start) => {
                let elapsed = now.saturating_duration_since(start);
                (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
            }
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress_at(Instant::now())
    }

    pub fn is_animating(&self) -> bool {
        self.started.is_some() && self.progress() < 1.0
    }
}

/// TUI-specific presentation state (not part of the view-model)
pub struct TuiState {
    pub country_list: CountryListState,
    pub city_panel: CityPanelState,
    pub fade: FadeIn,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            country_list: CountryListState::new(),
            city_panel: CityPanelState::new(),
            fade: FadeIn::new(FADE_DURATION),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Build the HTTP provider from resolved settings.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn DataProvider> {
    Arc::new(
        HttpProvider::new(
            config.countries_url.clone(),
            config.cities_url.clone(),
            config.timeout,
        )
        .with_countries_fields(config.countries_fields.clone()),
    )
}

/// Fetch the country list and wrap the outcome as an action.
pub async fn load_countries(provider: &dyn DataProvider) -> Action {
    Action::CountriesLoaded(provider.fetch_countries().await)
}

/// Fetch cities for one request and wrap the outcome as an action.
pub async fn load_cities(
    provider: &dyn DataProvider,
    request: RequestId,
    query: CityQuery,
) -> Action {
    let result = provider.fetch_cities(&query).await;
    Action::CitiesLoaded { request, result }
}

/// Tracks background tasks so they can be aborted.
struct Tasks {
    provider: Arc<dyn DataProvider>,
    tx: mpsc::Sender<Action>,
    countries: Option<tokio::task::AbortHandle>,
    cities: Option<tokio::task::AbortHandle>,
}

impl Tasks {
    fn spawn_countries(&mut self) {
        info!("Spawning country list request via {}", self.provider.name());
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let action = load_countries(provider.as_ref()).await;
            if tx.send(action).is_err() {
                warn!("Failed to deliver country list: receiver dropped");
            }
        });
        self.countries = Some(handle.abort_handle());
    }

    fn spawn_cities(&mut self, request: RequestId, query: CityQuery) {
        self.cancel_cities();
        info!("Spawning city request {} for {}", request, query.country);
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let action = load_cities(provider.as_ref(), request, query).await;
            if tx.send(action).is_err() {
                warn!("Failed to deliver cities for request {}: receiver dropped", request);
            }
        });
        self.cities = Some(handle.abort_handle());
    }

    fn cancel_cities(&mut self) {
        if let Some(handle) = self.cities.take() {
            debug!("Aborting in-flight city request");
            handle.abort();
        }
    }

    fn abort_all(&mut self) {
        self.cancel_cities();
        if let Some(handle) = self.countries.take() {
            handle.abort();
        }
    }
}

/// Apply an action and carry out its effect. Returns true when the app should quit.
fn dispatch(app: &mut App, tui: &mut TuiState, tasks: &mut Tasks, action: Action) -> bool {
    let resets_cities = matches!(
        action,
        Action::CitiesLoaded { .. }
            | Action::SearchCities(_)
            | Action::ToggleCities
            | Action::SelectCountry(_)
    );
    let resets_countries = matches!(action, Action::Search(_) | Action::CountriesLoaded(_));

    let effect = update(app, action);

    if resets_cities {
        tui.city_panel.reset();
    }
    if resets_countries {
        tui.country_list.reset();
    }

    match effect {
        Effect::None => false,
        Effect::FetchCountries => {
            tasks.spawn_countries();
            false
        }
        Effect::StartFadeIn => {
            tui.fade.start(Instant::now());
            false
        }
        Effect::FetchCities { request, query } => {
            tasks.spawn_cities(request, query);
            false
        }
        Effect::CancelCities => {
            tasks.cancel_cities();
            false
        }
        Effect::Quit => true,
    }
}

/// Map a terminal event to an action for the current view.
fn route_event(
    app: &App,
    tui: &mut TuiState,
    event: &TuiEvent,
    list_area: ratatui::layout::Rect,
) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }

    if app.selected.is_none() {
        // List view
        if matches!(event, TuiEvent::Escape) {
            return Some(Action::Quit);
        }
        if let Some(text) = apply_edit(&app.search_text, event) {
            return Some(Action::Search(text));
        }
        let visible = app.visible_countries();
        tui.country_list.item_count = visible.len();

        let picked = match event {
            TuiEvent::MouseClick(_, row) => hit_test_row(
                *row,
                list_area,
                tui.country_list.list_state.offset(),
                visible.len(),
            ),
            _ => match tui.country_list.handle_event(event) {
                Some(CountryListEvent::Select(index)) => Some(index),
                None => None,
            },
        };
        return picked
            .and_then(|index| visible.get(index))
            .map(|country| Action::SelectCountry((*country).clone()));
    }

    // Detail view
    match event {
        TuiEvent::Escape => Some(Action::Deselect),
        TuiEvent::Submit => Some(Action::ToggleCities),
        TuiEvent::SortAsc if app.cities_visible() => Some(Action::SetSort(SortOrder::Asc)),
        TuiEvent::SortDesc if app.cities_visible() => Some(Action::SetSort(SortOrder::Desc)),
        TuiEvent::CursorUp
        | TuiEvent::CursorDown
        | TuiEvent::PageUp
        | TuiEvent::PageDown
        | TuiEvent::ScrollUp
        | TuiEvent::ScrollDown => {
            tui.city_panel.handle_event(event);
            None
        }
        _ if app.cities_visible() => {
            apply_edit(&app.city_search_text, event).map(Action::SearchCities)
        }
        // Typing with the city section closed goes back to the country search
        _ => apply_edit(&app.search_text, event).map(Action::Search),
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    let mut app = App::new(config.sort_order);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut tasks = Tasks {
        provider,
        tx,
        countries: None,
        cities: None,
    };

    let start_time = Instant::now();
    let mut needs_redraw = true;
    let mut should_quit = dispatch(&mut app, &mut tui, &mut tasks, Action::Start);

    while !should_quit {
        let animating = tui.fade.is_animating()
            || app.country_list == CountryListStatus::Loading
            || app.pending_request().is_some();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            let frame_area = terminal.get_frame().area();
            let list_area = ui::ScreenLayout::new(frame_area, app.error.is_some()).main;
            if let Some(action) = route_event(&app, &mut tui, &event, list_area) {
                debug!("User action: {:?}", action);
                if dispatch(&mut app, &mut tui, &mut tasks, action) {
                    should_quit = true;
                    break;
                }
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut tui, &mut tasks, action) {
                should_quit = true;
            }
        }
    }

    info!("Shutting down");
    tasks.abort_all();
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestError;
    use crate::test_support::{StubProvider, country, loaded_app, testland_cities};
    use ratatui::layout::Rect;

    const LIST_AREA: Rect = Rect { x: 0, y: 4, width: 80, height: 20 };

    #[test]
    fn test_fade_progress() {
        let mut fade = FadeIn::new(Duration::from_millis(1000));
        let t0 = Instant::now();
        assert_eq!(fade.progress_at(t0), 0.0);
        fade.start(t0);
        assert!((fade.progress_at(t0 + Duration::from_millis(500)) - 0.5).abs() < 0.01);
        assert_eq!(fade.progress_at(t0 + Duration::from_secs(3)), 1.0);

        // Restarting is ignored
        fade.start(t0 + Duration::from_secs(10));
        assert_eq!(fade.progress_at(t0 + Duration::from_secs(3)), 1.0);
    }

    #[test]
    fn test_load_countries_wraps_result() {
        let provider = StubProvider::new(vec![country("Peru")], Vec::new());
        let action = tokio_test::block_on(load_countries(&provider));
        let Action::CountriesLoaded(Ok(batch)) = action else {
            panic!("expected CountriesLoaded(Ok)");
        };
        assert_eq!(batch.countries[0].common_name, "Peru");
    }

    #[test]
    fn test_load_cities_forwards_query_and_request_id() {
        let provider = StubProvider::new(Vec::new(), testland_cities());
        let query = CityQuery::for_country(&country("Testland"), SortOrder::Asc);
        let action = tokio_test::block_on(load_cities(&provider, 7, query.clone()));

        assert!(matches!(action, Action::CitiesLoaded { request: 7, result: Ok(ref c) } if c.len() == 2));
        assert_eq!(provider.queries.lock().unwrap().as_slice(), &[query]);
    }

    #[test]
    fn test_load_cities_failure_is_forwarded() {
        let mut provider = StubProvider::new(Vec::new(), Vec::new());
        provider.cities = Err(RequestError::Network("down".into()));
        let query = CityQuery::for_country(&country("Testland"), SortOrder::Asc);
        let action = tokio_test::block_on(load_cities(&provider, 1, query));
        assert!(matches!(action, Action::CitiesLoaded { result: Err(_), .. }));
    }

    #[test]
    fn test_typing_in_list_view_searches() {
        let app = loaded_app(&["Germany"]);
        let mut tui = TuiState::new();
        let action = route_event(&app, &mut tui, &TuiEvent::InputChar('g'), LIST_AREA);
        assert_eq!(action, Some(Action::Search("g".to_string())));
    }

    #[test]
    fn test_enter_selects_highlighted_country() {
        let app = loaded_app(&["Germany", "Peru"]);
        let mut tui = TuiState::new();
        route_event(&app, &mut tui, &TuiEvent::CursorDown, LIST_AREA);
        let action = route_event(&app, &mut tui, &TuiEvent::Submit, LIST_AREA);
        assert_eq!(action, Some(Action::SelectCountry(country("Peru"))));
    }

    #[test]
    fn test_click_selects_country_under_cursor() {
        let app = loaded_app(&["Germany", "Peru"]);
        let mut tui = TuiState::new();
        // First row inside the border
        let action = route_event(&app, &mut tui, &TuiEvent::MouseClick(3, 5), LIST_AREA);
        assert_eq!(action, Some(Action::SelectCountry(country("Germany"))));
    }

    #[test]
    fn test_escape_quits_from_list_and_goes_back_from_detail() {
        let mut app = loaded_app(&["Germany"]);
        let mut tui = TuiState::new();
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::Escape, LIST_AREA), Some(Action::Quit));

        update(&mut app, Action::SelectCountry(country("Germany")));
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::Escape, LIST_AREA), Some(Action::Deselect));
    }

    #[test]
    fn test_detail_view_routes_typing_by_section() {
        let mut app = loaded_app(&["Testland"]);
        let mut tui = TuiState::new();
        update(&mut app, Action::SelectCountry(country("Testland")));

        // Section closed: typing returns to the country search
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('x'), LIST_AREA),
            Some(Action::Search("x".to_string()))
        );
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::SortDesc, LIST_AREA), None);

        if let Effect::FetchCities { request, .. } = update(&mut app, Action::ToggleCities) {
            update(&mut app, Action::CitiesLoaded { request, result: Ok(testland_cities()) });
        }
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('a'), LIST_AREA),
            Some(Action::SearchCities("a".to_string()))
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::SortDesc, LIST_AREA),
            Some(Action::SetSort(SortOrder::Desc))
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Submit, LIST_AREA),
            Some(Action::ToggleCities)
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut app = loaded_app(&["Germany"]);
        let mut tui = TuiState::new();
        update(&mut app, Action::SelectCountry(country("Germany")));
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::ForceQuit, LIST_AREA), Some(Action::Quit));
    }
}
