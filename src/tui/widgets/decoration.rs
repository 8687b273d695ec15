use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

use crate::config::DisplayConfig;
use crate::formatting::BoxChars;
use crate::tui::component::ElementWidget;

/// Caption above the input field
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub disabled: bool,
}

impl ElementWidget for Label {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.height == 0 {
            return;
        }
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if self.disabled {
            style = style.fg(config.muted_fg);
        }
        buf.set_stringn(area.x, area.y, &self.text, usize::from(area.width), style);
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }
}

/// Drop shadow cast by the calendar popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shadow;

impl ElementWidget for Shadow {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        let chars = BoxChars::from_use_unicode(config.use_unicode);
        let style = Style::default().fg(config.muted_fg);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                buf[(x, y)].set_symbol(chars.shadow).set_style(style);
            }
        }
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(*self)
    }
}

/// Horizontal rule marking the bottom edge of the host frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRule {
    /// Frame height in pixels, shown at the right end
    pub height_px: u32,
}

impl ElementWidget for FrameRule {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let chars = BoxChars::from_use_unicode(config.use_unicode);
        let style = Style::default().fg(config.muted_fg);
        let caption = format!(" {}px ", self.height_px);
        let rule_width = area.width.saturating_sub(caption.len() as u16);
        buf.set_string(
            area.x,
            area.y,
            chars.horizontal.repeat(usize::from(rule_width)),
            style,
        );
        buf.set_stringn(
            area.x + rule_width,
            area.y,
            &caption,
            usize::from(area.width - rule_width),
            style,
        );
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }
}
