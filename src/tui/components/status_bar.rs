use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::formatting::BoxChars;
use crate::tui::component::{Component, Element, ElementWidget};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBarProps {
    /// Status or help message on the left
    pub message: String,
    pub is_error: bool,
    /// Layout readout on the right
    pub layout_text: String,
}

/// StatusBar component - separator line plus message and layout readout
///
/// ```text
/// ──────────────────────────────────┬──────────────────
///  Enter: open | Del: clear | q: quit│ scale 1.00 80px
/// ```
pub struct StatusBar;

impl Component for StatusBar {
    type Props = StatusBarProps;
    type State = ();

    fn view(&self, props: &Self::Props, _state: &Self::State) -> Element {
        Element::Widget(Box::new(StatusBarWidget {
            props: props.clone(),
        }))
    }
}

#[derive(Clone)]
struct StatusBarWidget {
    props: StatusBarProps,
}

impl ElementWidget for StatusBarWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        let chars = BoxChars::from_use_unicode(config.use_unicode);
        let connector = if config.use_unicode { "┬" } else { "+" };

        // Bar sits one column left of the right text and its margin
        let right_text = format!(" {} ", self.props.layout_text);
        let bar_position = area.width.saturating_sub(right_text.width() as u16 + 1);

        let line1 = format!(
            "{}{}{}",
            chars.horizontal.repeat(usize::from(bar_position)),
            connector,
            chars
                .horizontal
                .repeat(usize::from(area.width.saturating_sub(bar_position + 1)))
        );

        let left_text = if self.props.is_error {
            format!(" ERROR: {}", self.props.message)
        } else {
            format!(" {}", self.props.message)
        };
        let left_style = if self.props.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        let padding = usize::from(bar_position).saturating_sub(left_text.width());

        let line2 = Line::from(vec![
            Span::styled(left_text, left_style),
            Span::raw(" ".repeat(padding)),
            Span::raw(chars.vertical),
            Span::styled(right_text, Style::default().fg(config.muted_fg)),
        ]);

        Paragraph::new(vec![Line::raw(line1), line2]).render(area, buf);
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }
}
