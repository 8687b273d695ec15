/// Calendar widget - one month grid with a caption and weekday header
///
/// Layout (rows): top border, caption with month arrows, weekday header,
/// six weeks, bottom border. Weeks start on Sunday and always show six rows,
/// so days of the neighbouring months fill the grid.
use chrono::{Datelike, Days, NaiveDate, Weekday};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::formatting::{month_caption, BoxChars, WEEKDAY_LABELS};
use crate::layout_constants::CALENDAR_ROWS;
use crate::tui::component::ElementWidget;
use crate::tui::layout::CalendarScale;
use crate::types::DateBounds;

const WEEKS: u16 = 6;
const CAPTION_ROW: u16 = 0;
const HEADER_ROW: u16 = 1;
const FIRST_WEEK_ROW: u16 = 2;
/// Columns at each end of the caption that act as month arrows
const ARROW_HIT_WIDTH: u16 = 2;

/// What a pointer press on the calendar landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarHit {
    PreviousMonth,
    NextMonth,
    Day(NaiveDate),
    /// Border, caption text or weekday header
    Chrome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    /// Focused day; its month is displayed
    pub cursor: NaiveDate,
    pub selected: Option<NaiveDate>,
    pub today: NaiveDate,
    pub bounds: DateBounds,
    /// Columns per day
    pub day_width: u16,
}

impl Calendar {
    pub fn new(
        cursor: NaiveDate,
        selected: Option<NaiveDate>,
        today: NaiveDate,
        bounds: DateBounds,
        scale: CalendarScale,
    ) -> Self {
        Self {
            cursor,
            selected,
            today,
            bounds,
            day_width: scale.day_column_width(),
        }
    }

    pub fn width(&self) -> u16 {
        self.day_width * 7 + 2
    }

    pub fn height(&self) -> u16 {
        CALENDAR_ROWS
    }

    /// Sunday on or before the first of the displayed month
    pub fn grid_start(&self) -> NaiveDate {
        let first = self.cursor.with_day(1).unwrap_or(self.cursor);
        let offset = u64::from(first.weekday().num_days_from_sunday());
        first.checked_sub_days(Days::new(offset)).unwrap_or(first)
    }

    /// Date shown at `week` (0-5) and `column` (0 = Sunday)
    pub fn date_at(&self, week: u16, column: u16) -> Option<NaiveDate> {
        if week >= WEEKS || column >= 7 {
            return None;
        }
        self.grid_start()
            .checked_add_days(Days::new(u64::from(week * 7 + column)))
    }

    /// Locate a pointer press within the calendar drawn at `area`
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<CalendarHit> {
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if !inner.contains(Position::new(column, row)) {
            return Some(CalendarHit::Chrome);
        }

        let rel_row = row - inner.y;
        let rel_col = column - inner.x;
        let hit = match rel_row {
            CAPTION_ROW if rel_col < ARROW_HIT_WIDTH => CalendarHit::PreviousMonth,
            CAPTION_ROW if rel_col >= inner.width.saturating_sub(ARROW_HIT_WIDTH) => {
                CalendarHit::NextMonth
            }
            r if r >= FIRST_WEEK_ROW => self
                .date_at(r - FIRST_WEEK_ROW, rel_col / self.day_width.max(1))
                .map_or(CalendarHit::Chrome, CalendarHit::Day),
            _ => CalendarHit::Chrome,
        };
        Some(hit)
    }

    /// Cell text, right-aligned with one column of spacing
    fn cell_text(&self, text: &str) -> String {
        let pad = usize::from(self.day_width.saturating_sub(1)).saturating_sub(text.width());
        format!("{}{} ", " ".repeat(pad), text)
    }

    fn weekday_style(weekday: Weekday) -> Style {
        match weekday {
            Weekday::Sun => Style::default().fg(Color::Red),
            Weekday::Sat => Style::default().fg(Color::Blue),
            _ => Style::default(),
        }
    }

    fn day_style(&self, date: NaiveDate, config: &DisplayConfig) -> Style {
        let mut style = if date.month() != self.cursor.month() {
            Style::default().fg(config.muted_fg)
        } else {
            Self::weekday_style(date.weekday())
        };
        if !self.bounds.contains(date) {
            style = style.fg(config.muted_fg).add_modifier(Modifier::DIM);
        }
        if date == self.today {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if Some(date) == self.selected {
            // Full highlight only while the cursor rests on the selection
            let bg = if date == self.cursor {
                config.selection_fg
            } else {
                config.unfocused_selection_fg()
            };
            style = style.fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD);
        } else if date == self.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }

    fn render_caption(&self, inner: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        let (prev, next) = if config.use_unicode { ("◀", "▶") } else { ("<", ">") };
        let y = inner.y + CAPTION_ROW;
        buf.set_string(inner.x, y, prev, Style::default());
        buf.set_string(inner.right().saturating_sub(1), y, next, Style::default());

        let caption = month_caption(self.cursor);
        let x = inner.x + inner.width.saturating_sub(caption.width() as u16) / 2;
        buf.set_stringn(
            x,
            y,
            &caption,
            usize::from(inner.width),
            Style::default().add_modifier(Modifier::BOLD),
        );
    }

    fn render_header(&self, inner: Rect, buf: &mut Buffer) {
        let y = inner.y + HEADER_ROW;
        let weekdays = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ];
        for (column, (label, weekday)) in WEEKDAY_LABELS.iter().zip(weekdays).enumerate() {
            let x = inner.x + column as u16 * self.day_width;
            buf.set_stringn(
                x,
                y,
                self.cell_text(label),
                usize::from(inner.right().saturating_sub(x)),
                Self::weekday_style(weekday),
            );
        }
    }

    fn render_weeks(&self, inner: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        for week in 0..WEEKS {
            let y = inner.y + FIRST_WEEK_ROW + week;
            if y >= inner.bottom() {
                break;
            }
            for column in 0..7 {
                let Some(date) = self.date_at(week, column) else {
                    continue;
                };
                let x = inner.x + column * self.day_width;
                if x >= inner.right() {
                    break;
                }
                let text = self.cell_text(&date.day().to_string());
                // Style the number, not the spacing column
                let number_width = usize::from(self.day_width.saturating_sub(1));
                buf.set_stringn(
                    x,
                    y,
                    &text[..number_width.min(text.len())],
                    usize::from(inner.right() - x),
                    self.day_style(date, config),
                );
            }
        }
    }
}

impl ElementWidget for Calendar {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        let chars = BoxChars::from_use_unicode(config.use_unicode);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(chars.border_set());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height <= FIRST_WEEK_ROW || inner.width == 0 {
            return;
        }

        self.render_caption(inner, buf, config);
        self.render_header(inner, buf);
        self.render_weeks(inner, buf, config);
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }
}
