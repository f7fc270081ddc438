//! # Country List Component
//!
//! Selectable list of the countries matching the search text, one row per
//! country with its emoji flag. Follows the persistent state + transient
//! wrapper pattern:
//! - `CountryListState` lives in `TuiState`
//! - `CountryList` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::api::Country;
use crate::core::state::CountryListStatus;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{ACCENT_RGB, faded, truncate_to_width};
use crate::tui::event::TuiEvent;

/// Rows moved by PageUp / PageDown.
const PAGE_SIZE: usize = 10;

/// Persistent cursor state for the country list.
pub struct CountryListState {
    pub selected: usize,
    pub list_state: ListState,
    /// Number of rows currently visible. Updated by the event loop before dispatch.
    pub item_count: usize,
}

impl Default for CountryListState {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryListState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default(),
            item_count: 0,
        }
    }

    /// Jump back to the first row (the filter changed).
    pub fn reset(&mut self) {
        self.selected = 0;
        self.list_state = ListState::default();
    }

    fn move_to(&mut self, index: usize) {
        if self.item_count == 0 {
            return;
        }
        self.selected = index.min(self.item_count - 1);
        self.list_state.select(Some(self.selected));
    }
}

/// Events emitted by the country list.
#[derive(Debug, Clone, PartialEq)]
pub enum CountryListEvent {
    /// Index into the visible (filtered) countries.
    Select(usize),
}

impl EventHandler for CountryListState {
    type Event = CountryListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<CountryListEvent> {
        match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                self.move_to(self.selected.saturating_sub(1));
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                self.move_to(self.selected + 1);
                None
            }
            TuiEvent::PageUp => {
                self.move_to(self.selected.saturating_sub(PAGE_SIZE));
                None
            }
            TuiEvent::PageDown => {
                self.move_to(self.selected + PAGE_SIZE);
                None
            }
            TuiEvent::Submit if self.selected < self.item_count => {
                Some(CountryListEvent::Select(self.selected))
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the country list.
pub struct CountryList<'a> {
    pub state: &'a mut CountryListState,
    pub countries: &'a [&'a Country],
    pub status: CountryListStatus,
    pub query: &'a str,
    /// Fade-in progress, 0.0 to 1.0.
    pub fade: f32,
}

impl Component for CountryList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Countries ")
            .title_bottom(Line::from(" Enter Select  Esc Quit ").centered());

        self.state.item_count = self.countries.len();

        if self.countries.is_empty() {
            let message = match self.status {
                CountryListStatus::Loading => "Loading countries...".to_string(),
                CountryListStatus::Failed => String::new(),
                CountryListStatus::Loaded if self.query.is_empty() => {
                    "No countries available.".to_string()
                }
                CountryListStatus::Loaded => format!("No countries match \"{}\"", self.query),
            };
            let empty = Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        if self.state.selected >= self.countries.len() {
            self.state.selected = self.countries.len() - 1;
        }
        self.state.list_state.select(Some(self.state.selected));

        let text_color = faded(ACCENT_RGB, self.fade);
        let inner_width = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = self
            .countries
            .iter()
            .enumerate()
            .map(|(i, country)| {
                let flag = country.flag_emoji.as_deref().unwrap_or("  ");
                let name = truncate_to_width(&country.common_name, inner_width.saturating_sub(4));
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Gray)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(text_color).add_modifier(Modifier::BOLD)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!(" {flag} ")),
                    Span::styled(name, style),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Hit test: map a screen row inside the list area to a visible-country index.
pub fn hit_test_row(row: u16, list_area: Rect, offset: usize, item_count: usize) -> Option<usize> {
    // Skip the top and bottom borders
    let first_row = list_area.y + 1;
    let last_row = (list_area.y + list_area.height).saturating_sub(1);
    if row < first_row || row >= last_row {
        return None;
    }
    let index = offset + (row - first_row) as usize;
    (index < item_count).then_some(index)
}
