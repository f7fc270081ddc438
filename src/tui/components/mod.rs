//! # TUI Components
//!
//! Reusable UI components following a React-like pattern.
//!
//! Each component has clear responsibilities and receives data via props
//! (struct fields). Stateful components keep a persistent `*State` in
//! `TuiState` and are wrapped by a transient renderer each frame.

pub mod city_panel;
pub mod country_card;
pub mod country_list;
pub mod search_box;
pub mod title_bar;

pub use city_panel::{CityPanel, CityPanelState};
pub use country_card::CountryCard;
pub use country_list::{CountryList, CountryListEvent, CountryListState};
pub use search_box::SearchBox;
pub use title_bar::TitleBar;

use ratatui::style::Color;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Teal, the app's accent colour.
pub const ACCENT_RGB: (u8, u8, u8) = (0, 128, 128);
pub const ACCENT: Color = Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2);

/// Starting colour of the fade-in (near the terminal background).
const FADE_FROM_RGB: (u8, u8, u8) = (24, 24, 24);

/// Interpolates from the fade start colour towards `target` (`progress` in 0..=1).
pub fn faded(target: (u8, u8, u8), progress: f32) -> Color {
    let t = progress.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| -> u8 {
        (from as f32 + (to as f32 - from as f32) * t).round() as u8
    };
    Color::Rgb(
        mix(FADE_FROM_RGB.0, target.0),
        mix(FADE_FROM_RGB.1, target.1),
        mix(FADE_FROM_RGB.2, target.2),
    )
}

/// Truncate to `max_width` display columns, adding "..." if needed.
///
/// Width-aware so flags, CJK names and accented letters don't overflow.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faded_endpoints() {
        assert_eq!(faded(ACCENT_RGB, 1.0), ACCENT);
        assert_eq!(faded(ACCENT_RGB, 0.0), Color::Rgb(24, 24, 24));
        assert_eq!(faded(ACCENT_RGB, 5.0), ACCENT);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Peru", 10), "Peru");
        assert_eq!(truncate_to_width("United Kingdom", 9), "United...");
        assert_eq!(truncate_to_width("Åland Islands", 8), "Åland...");
        assert_eq!(truncate_to_width("日本国", 5), "日...");
        assert_eq!(truncate_to_width("Chad", 2), "..");
    }
}
