//! # TitleBar Component
//!
//! Top status bar: app name, status text, and a spinner while a request
//! is in flight.
//!
//! Purely presentational; all data arrives as props:
//! - `status_message`: core App state ("250 countries", "Loading countries...")
//! - `loading`: whether any request is pending
//! - `spinner_frame`: animation tick from the event loop
//!
//! ## Conditional Formatting
//!
//! 1. **Loading**: `"Country Search App | Loading countries... ⠹"`
//! 2. **Status message**: `"Country Search App | 250 countries"`
//! 3. **Default**: `"Country Search App"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;
use crate::tui::components::{ACCENT, truncate_to_width};

pub const APP_TITLE: &str = "Country Search App";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar {
    pub status_message: String,
    pub loading: bool,
    pub spinner_frame: usize,
}

impl TitleBar {
    pub fn new(status_message: String, loading: bool, spinner_frame: usize) -> Self {
        Self {
            status_message,
            loading,
            spinner_frame,
        }
    }

    fn status_text(&self) -> String {
        match (self.status_message.is_empty(), self.loading) {
            (true, false) => String::new(),
            (true, true) => format!(" | {}", SPINNER[self.spinner_frame % SPINNER.len()]),
            (false, false) => format!(" | {}", self.status_message),
            (false, true) => format!(
                " | {} {}",
                self.status_message,
                SPINNER[self.spinner_frame % SPINNER.len()]
            ),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_width = APP_TITLE.len();
        let status = truncate_to_width(
            &self.status_text(),
            (area.width as usize).saturating_sub(title_width),
        );
        let line = Line::from(vec![
            Span::styled(
                APP_TITLE,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw(status),
        ]);
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status() {
        let mut title_bar = TitleBar::new("250 countries".to_string(), false, 0);
        let text = render_text(&mut title_bar);
        assert!(text.contains("Country Search App"));
        assert!(text.contains("| 250 countries"));
        assert!(!text.contains('⠋'));
    }

    #[test]
    fn test_title_bar_loading_shows_spinner() {
        let mut title_bar = TitleBar::new("Loading countries...".to_string(), true, 1);
        let text = render_text(&mut title_bar);
        assert!(text.contains("Loading countries..."));
        assert!(text.contains('⠙'));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new(String::new(), false, 0);
        let text = render_text(&mut title_bar);
        assert!(text.contains("Country Search App"));
        assert!(!text.contains('|'));
    }
}
