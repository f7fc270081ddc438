//! # Country Card Component
//!
//! Detail card for the selected country, with the toggle button that
//! opens or closes the city section.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::api::Country;
use crate::tui::component::Component;
use crate::tui::components::{ACCENT, ACCENT_RGB, faded};

/// Border (2) + name, capital, population, languages, currencies, flag, gap, button.
pub const CARD_HEIGHT: u16 = 10;

/// 83240525 → "83,240,525"
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub struct CountryCard<'a> {
    pub country: &'a Country,
    pub toggle_label: &'a str,
    pub fade: f32,
}

impl CountryCard<'_> {
    fn field<'b>(label: &'b str, value: String, color: Color) -> Line<'b> {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(color)),
        ])
    }

    fn lines(&self) -> Vec<Line<'_>> {
        let color = faded(ACCENT_RGB, self.fade);
        let country = self.country;
        let or_na = |s: String| if s.is_empty() { "N/A".to_string() } else { s };

        let mut heading = Vec::new();
        if let Some(flag) = &country.flag_emoji {
            heading.push(Span::raw(format!("{flag} ")));
        }
        heading.push(Span::styled(
            country.common_name.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        if let Some(region) = &country.region {
            heading.push(Span::styled(
                format!("  ({region})"),
                Style::default().fg(Color::DarkGray),
            ));
        }

        vec![
            Line::from(heading),
            Self::field("Capital: ", country.capital().unwrap_or("N/A").to_string(), color),
            Self::field("Population: ", format_population(country.population), color),
            Self::field("Languages: ", or_na(country.language_names()), color),
            Self::field("Currencies: ", or_na(country.currency_labels()), color),
            Self::field("Flag: ", country.flag_image_url.clone(), Color::DarkGray),
            Line::default(),
            Line::from(Span::styled(
                format!("[ {} ]", self.toggle_label),
                Style::default()
                    .fg(Color::White)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
        ]
    }
}

impl Component for CountryCard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Selected Country ")
            .title_bottom(Line::from(" Enter Toggle cities  Esc Back ").centered());

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
