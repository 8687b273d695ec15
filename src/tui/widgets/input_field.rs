use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::formatting::{BoxChars, PLACEHOLDER};
use crate::tui::component::ElementWidget;

/// Read-only field showing the selected date, or a placeholder
///
/// ```text
/// ╭──────────────────────╮
/// │ 2024/01/15         ▾ │
/// ╰──────────────────────╯
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    /// Selected date in the display format
    pub text: Option<String>,
    pub open: bool,
    pub disabled: bool,
}

impl InputField {
    fn border_style(&self, config: &DisplayConfig) -> Style {
        if self.disabled {
            Style::default().fg(config.muted_fg)
        } else if self.open {
            Style::default().fg(config.selection_fg)
        } else {
            Style::default()
        }
    }
}

impl ElementWidget for InputField {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        let chars = BoxChars::from_use_unicode(config.use_unicode);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(chars.border_set())
            .border_style(self.border_style(config));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 3 || inner.height == 0 {
            return;
        }

        // One column of padding on each side, dropdown glyph on the right
        let text_width = usize::from(inner.width - 3);
        let (text, style) = match &self.text {
            Some(text) if self.disabled => (text.as_str(), Style::default().fg(config.muted_fg)),
            Some(text) => (text.as_str(), Style::default()),
            None => (PLACEHOLDER, Style::default().fg(config.muted_fg)),
        };
        buf.set_stringn(inner.x + 1, inner.y, text, text_width, style);

        let mut glyph_style = Style::default().fg(config.muted_fg);
        if self.open {
            glyph_style = glyph_style.add_modifier(Modifier::BOLD);
        }
        let glyph_x = inner.right().saturating_sub(1 + chars.dropdown.width() as u16);
        buf.set_string(glyph_x, inner.y, chars.dropdown, glyph_style);
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }
}
