//! General test utilities for TUI tests.
//!
//! # Usage
//!
//! ```rust
//! #[cfg(test)]
//! mod tests {
//!     use crate::tui::testing::*;
//!
//!     #[test]
//!     fn test_example() {
//!         let state = test_state(Configuration::default());
//!         // Reduce actions against state...
//!     }
//! }
//! ```

use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::types::Configuration;

use super::state::AppState;

/// Constant for general rendering width
pub const RENDER_WIDTH: u16 = 80;

/// Date every test state treats as today (a Saturday)
pub fn today() -> NaiveDate {
    date(2024, 1, 20)
}

/// Shorthand for a known-valid date
///
/// # Panics
///
/// Panics on an invalid date (acceptable in test code).
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Fresh state with default settings and a fixed today
pub fn test_state(args: Configuration) -> AppState {
    AppState::new(args, Config::default(), today())
}

/// Helper to extract lines from buffer, one symbol per cell
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buf[(x + area.x, y + area.y)].symbol())
                .collect::<String>()
        })
        .collect()
}

/// Lines as they appear on screen
///
/// Cells covered by a double-width symbol are skipped, so `日` occupies two
/// columns but contributes one character.
pub fn display_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area();
    (0..area.height)
        .map(|y| {
            let mut line = String::new();
            let mut x = 0;
            while x < area.width {
                let symbol = buf[(x + area.x, y + area.y)].symbol();
                line.push_str(symbol);
                x += (symbol.width() as u16).max(1);
            }
            line
        })
        .collect()
}

/// Helper for buffer assertions against the on-screen text
pub fn assert_buffer(buf: &Buffer, expected: &[&str]) {
    let actual = display_lines(buf);
    let buffer_width = buf.area().width as usize;

    assert_eq!(
        actual.len(),
        expected.len(),
        "Buffer height mismatch: expected {} lines, got {}",
        expected.len(),
        actual.len()
    );
    for (i, expected_line) in expected.iter().enumerate() {
        assert_eq!(
            actual[i].width(),
            buffer_width,
            "Line {} width mismatch: expected {}, got {}",
            i,
            buffer_width,
            actual[i].width()
        );
        assert_eq!(
            actual[i], *expected_line,
            "Line {} mismatch:\nExpected: '{}'\nActual:   '{}'",
            i, expected_line, actual[i]
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{layout::Rect, style::Style};

    #[test]
    fn test_display_lines_skip_wide_cells() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        buf.set_string(0, 0, "日付", Style::default());
        assert_eq!(display_lines(&buf), vec!["日付  "]);
        assert_eq!(buffer_lines(&buf)[0].chars().count(), 6);
    }

    #[test]
    fn test_state_uses_fixed_today() {
        let state = test_state(Configuration::default());
        assert_eq!(state.system.today, today());
        assert_eq!(state.picker.cursor, today());
    }
}
