//! # SearchBox Component
//!
//! Single-line text input used for both the country and the city search.
//!
//! The text itself lives in core state (`App::search_text`,
//! `App::city_search_text`); the box only renders it and computes the
//! edited value for a key event. Keeping no buffer here means a reset in
//! `update()` can never leave a stale query on screen.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;
use crate::tui::components::ACCENT;
use crate::tui::event::TuiEvent;

/// Returns the new text if `event` edits it.
pub fn apply_edit(text: &str, event: &TuiEvent) -> Option<String> {
    match event {
        TuiEvent::InputChar(c) if !c.is_control() => {
            let mut edited = text.to_string();
            edited.push(*c);
            Some(edited)
        }
        TuiEvent::Paste(pasted) => {
            // Single-line input: newlines become spaces
            let cleaned: String = pasted
                .chars()
                .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                .filter(|c| !c.is_control())
                .collect();
            Some(format!("{text}{cleaned}"))
        }
        TuiEvent::Backspace if !text.is_empty() => {
            let mut edited = text.to_string();
            edited.pop();
            Some(edited)
        }
        _ => None,
    }
}

pub struct SearchBox<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub placeholder: &'a str,
    /// Focused boxes show the cursor and a highlighted border.
    pub focused: bool,
}

impl Component for SearchBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(border_style);

        let content = if self.text.is_empty() {
            Span::styled(self.placeholder, Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.text, Style::default().fg(ACCENT))
        };

        // Keep the tail visible when the query is wider than the box
        let inner_width = area.width.saturating_sub(3) as usize;
        let text_width = self.text.width();
        let scroll_x = text_width.saturating_sub(inner_width) as u16;

        frame.render_widget(
            Paragraph::new(content).block(block).scroll((0, scroll_x)),
            area,
        );

        if self.focused && area.width > 2 && area.height > 2 {
            let cursor_x = area.x + 1 + (text_width as u16).saturating_sub(scroll_x);
            frame.set_cursor_position(Position::new(
                cursor_x.min(area.x + area.width - 2),
                area.y + 1,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_apply_edit_typing_and_backspace() {
        assert_eq!(apply_edit("ge", &TuiEvent::InputChar('r')), Some("ger".to_string()));
        assert_eq!(apply_edit("ger", &TuiEvent::Backspace), Some("ge".to_string()));
        assert_eq!(apply_edit("", &TuiEvent::Backspace), None);
        assert_eq!(apply_edit("x", &TuiEvent::Submit), None);
    }

    #[test]
    fn test_apply_edit_backspace_removes_whole_char() {
        assert_eq!(apply_edit("Côte", &TuiEvent::Backspace), Some("Côt".to_string()));
        assert_eq!(apply_edit("Cô", &TuiEvent::Backspace), Some("C".to_string()));
    }

    #[test]
    fn test_apply_edit_paste_flattens_newlines() {
        assert_eq!(
            apply_edit("a", &TuiEvent::Paste("b\nc".to_string())),
            Some("ab c".to_string())
        );
    }

    #[test]
    fn test_placeholder_shown_when_empty() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                SearchBox {
                    title: "Search",
                    text: "",
                    placeholder: "Search for a country",
                    focused: true,
                }
                .render(f, f.area());
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Search for a country"));
    }
}
