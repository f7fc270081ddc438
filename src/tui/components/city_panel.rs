//! # City Panel Component
//!
//! The city section under the country card: header with the match count,
//! the city search box, the Asc/Desc sort radio, and a scrollable list of
//! cities with every population count.
//!
//! ## Architecture
//!
//! `CityPanel` is a transient component (created each frame) wrapping
//! `&'a mut CityPanelState` (persistent scroll state) plus props borrowed
//! from `App`. Entry heights are measured with `Paragraph::line_count`
//! so the `ScrollView` canvas matches what is drawn. The canvas is capped
//! at `MAX_LIST_ROWS`; cities past the cap are summarized in a note row.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::{City, SortOrder};
use crate::core::state::CitySection;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::search_box::SearchBox;
use crate::tui::components::{ACCENT, truncate_to_width};
use crate::tui::event::TuiEvent;

/// Persistent scroll state for the city list.
#[derive(Default)]
pub struct CityPanelState {
    pub scroll_state: ScrollViewState,
}

impl CityPanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the top (new data or new filter).
    pub fn reset(&mut self) {
        self.scroll_state.scroll_to_top();
    }
}

impl EventHandler for CityPanelState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::CursorDown | TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::PageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::PageDown => self.scroll_state.scroll_page_down(),
            _ => {}
        }
        None
    }
}

/// Sort radio line: "Sort by Population:  Asc (•)  Desc ( )"
pub fn sort_radio_line(order: SortOrder) -> Line<'static> {
    let option = |choice: SortOrder| {
        let marker = if choice == order { "(•)" } else { "( )" };
        let style = if choice == order {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!("  {} {}", choice.label(), marker), style)
    };
    Line::from(vec![
        Span::styled("Sort by Population:", Style::default().fg(ACCENT)),
        option(SortOrder::Asc),
        option(SortOrder::Desc),
        Span::styled("   Ctrl+A / Ctrl+D", Style::default().fg(Color::DarkGray)),
    ])
}

fn city_entry(city: &City, width: u16) -> Paragraph<'_> {
    let mut lines = vec![Line::from(Span::styled(
        truncate_to_width(&city.name, width as usize),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))];
    for count in &city.population_counts {
        lines.push(Line::from(Span::styled(
            format!(
                "  Year: {}  Population: {}  Sex: {}  Reliability: {}",
                count.year, count.value, count.sex, count.reliability
            ),
            Style::default().fg(Color::Gray),
        )));
    }
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

/// Row cap for the scroll canvas, which is allocated in full each frame.
const MAX_LIST_ROWS: u16 = 4096;

/// City entries placed on the scroll canvas.
struct CityListLayout<'a> {
    entries: Vec<(Paragraph<'a>, Rect)>,
    /// Canvas height, never above the row cap.
    height: u16,
    /// Cities that did not fit; a note row is reserved for them.
    omitted: usize,
}

/// Stack entries top to bottom until the next one would pass `max_rows`.
fn layout_cities(cities: &[City], width: u16, max_rows: u16) -> CityListLayout<'_> {
    let budget = max_rows.saturating_sub(1);
    let mut entries = Vec::new();
    let mut y: u16 = 0;

    for (index, city) in cities.iter().enumerate() {
        let paragraph = city_entry(city, width);
        let height = u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX);
        // y never exceeds budget, so the subtraction cannot underflow
        if height > budget - y {
            return CityListLayout {
                entries,
                height: y + 1,
                omitted: cities.len() - index,
            };
        }
        entries.push((paragraph, Rect::new(0, y, width, height)));
        y += height;
    }

    CityListLayout {
        entries,
        height: y,
        omitted: 0,
    }
}

pub struct CityPanel<'a> {
    pub state: &'a mut CityPanelState,
    pub country_name: &'a str,
    pub cities: &'a [City],
    pub search_text: &'a str,
    pub sort_order: SortOrder,
    pub section: CitySection,
}

impl CityPanel<'_> {
    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        if matches!(self.section, CitySection::Loading(_)) {
            let loading = Paragraph::new("Loading cities...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(loading, area);
            return;
        }
        if self.cities.is_empty() {
            let empty = Paragraph::new("No cities to show.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        // Leave a column for the scrollbar
        let content_width = area.width.saturating_sub(1);
        let layout = layout_cities(self.cities, content_width, MAX_LIST_ROWS);

        let mut scroll_view = ScrollView::new(Size::new(content_width, layout.height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (paragraph, rect) in layout.entries {
            scroll_view.render_widget(paragraph, rect);
        }
        if layout.omitted > 0 {
            let note = Paragraph::new(format!(
                "{} more cities not shown. Narrow the city search to see them.",
                layout.omitted
            ))
            .style(Style::default().fg(Color::DarkGray));
            scroll_view.render_widget(
                note,
                Rect::new(0, layout.height.saturating_sub(1), content_width, 1),
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl Component for CityPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} Cities ({}) ", self.country_name, self.cities.len()),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [search_area, sort_area, list_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        SearchBox {
            title: "City",
            text: self.search_text,
            placeholder: "Search for a city",
            focused: true,
        }
        .render(frame, search_area);
        frame.render_widget(sort_radio_line(self.sort_order), sort_area);
        self.render_list(frame, list_area);
    }
}
