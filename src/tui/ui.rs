use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::core::state::{App, CountryListStatus};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::country_card::CARD_HEIGHT;
use crate::tui::components::{CityPanel, CountryCard, CountryList, SearchBox, TitleBar};

/// Screen regions, computed the same way for drawing and hit testing.
pub struct ScreenLayout {
    pub title: Rect,
    pub search: Rect,
    pub main: Rect,
    pub error: Rect,
}

impl ScreenLayout {
    pub fn new(frame_area: Rect, has_error: bool) -> Self {
        use Constraint::{Length, Min};
        let error_height = if has_error { 1 } else { 0 };
        let [title, search, main, error] =
            Layout::vertical([Length(1), Length(3), Min(0), Length(error_height)])
                .areas(frame_area);
        Self {
            title,
            search,
            main,
            error,
        }
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let layout = ScreenLayout::new(frame.area(), app.error.is_some());
    let fade = tui.fade.progress();

    let loading =
        app.country_list == CountryListStatus::Loading || app.pending_request().is_some();
    TitleBar::new(app.status_message.clone(), loading, spinner_frame).render(frame, layout.title);

    // City search takes the cursor while the city panel is open
    SearchBox {
        title: "Search",
        text: &app.search_text,
        placeholder: "Search for a country",
        focused: !app.cities_visible(),
    }
    .render(frame, layout.search);

    match &app.selected {
        Some(country) => {
            let [card_area, cities_area] = if app.cities_visible() {
                Layout::vertical([Constraint::Length(CARD_HEIGHT), Constraint::Min(0)])
                    .areas(layout.main)
            } else {
                Layout::vertical([Constraint::Min(0), Constraint::Length(0)]).areas(layout.main)
            };

            CountryCard {
                country,
                toggle_label: app.toggle_label(),
                fade,
            }
            .render(frame, card_area);

            if app.cities_visible() {
                CityPanel {
                    state: &mut tui.city_panel,
                    country_name: &country.common_name,
                    cities: &app.filtered_cities,
                    search_text: &app.city_search_text,
                    sort_order: app.sort_order,
                    section: app.city_section,
                }
                .render(frame, cities_area);
            }
        }
        None => {
            let visible = app.visible_countries();
            CountryList {
                state: &mut tui.country_list,
                countries: &visible,
                status: app.country_list,
                query: &app.search_text,
                fade,
            }
            .render(frame, layout.main);
        }
    }

    if let Some(error) = &app.error {
        frame.render_widget(
            Span::styled(error.as_str(), Style::default().fg(Color::Red)),
            layout.error,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestError;
    use crate::core::action::{Action, update};
    use crate::test_support::{country, loaded_app, testland_cities};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_reserves_error_line_only_when_needed() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(ScreenLayout::new(area, false).error.height, 0);
        let with_error = ScreenLayout::new(area, true);
        assert_eq!(with_error.error.height, 1);
        assert_eq!(with_error.main.height, 24 - 1 - 3 - 1);
    }

    #[test]
    fn test_draw_country_list() {
        let app = loaded_app(&["Germany", "Peru"]);
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Country Search App"));
        assert!(text.contains("Germany"));
        assert!(text.contains("Peru"));
    }

    #[test]
    fn test_draw_country_fetch_error() {
        let mut app = App::new(crate::api::SortOrder::Asc);
        update(&mut app, Action::CountriesLoaded(Err(RequestError::Network("down".into()))));
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Failed to fetch country list. Please try again."));
    }

    #[test]
    fn test_draw_detail_with_cities() {
        let mut app = loaded_app(&["Testland"]);
        update(&mut app, Action::SelectCountry(country("Testland")));
        if let crate::core::action::Effect::FetchCities { request, .. } =
            update(&mut app, Action::ToggleCities)
        {
            update(&mut app, Action::CitiesLoaded { request, result: Ok(testland_cities()) });
        }
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Selected Country"));
        assert!(text.contains("[ Hide Cities ]"));
        assert!(text.contains("Testland Cities (2)"));
        assert!(text.find("Beta") < text.find("Alpha"));
    }
}
