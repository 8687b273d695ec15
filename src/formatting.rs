//! Date display formats, canonical value encoding and the Japanese locale table.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use phf::phf_map;
use ratatui::symbols::border;
use tracing::warn;

/// Weekday column headers, week starting on Sunday
pub const WEEKDAY_LABELS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Text shown in the input field when nothing is selected
pub const PLACEHOLDER: &str = "日付を選択";

/// Format used for the canonical value sent to the host
const CANONICAL_PATTERN: &str = "%Y-%m-%d";

/// One of the nine display patterns accepted from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateFormat {
    #[default]
    YearMonthDaySlash,
    DayMonthYearSlash,
    MonthDayYearSlash,
    YearMonthDayDash,
    DayMonthYearDash,
    MonthDayYearDash,
    YearMonthDayDot,
    DayMonthYearDot,
    MonthDayYearDot,
}

static DATE_FORMATS: phf::Map<&'static str, DateFormat> = phf_map! {
    "YYYY/MM/DD" => DateFormat::YearMonthDaySlash,
    "DD/MM/YYYY" => DateFormat::DayMonthYearSlash,
    "MM/DD/YYYY" => DateFormat::MonthDayYearSlash,
    "YYYY-MM-DD" => DateFormat::YearMonthDayDash,
    "DD-MM-YYYY" => DateFormat::DayMonthYearDash,
    "MM-DD-YYYY" => DateFormat::MonthDayYearDash,
    "YYYY.MM.DD" => DateFormat::YearMonthDayDot,
    "DD.MM.YYYY" => DateFormat::DayMonthYearDot,
    "MM.DD.YYYY" => DateFormat::MonthDayYearDot,
};

impl DateFormat {
    pub const ALL: [DateFormat; 9] = [
        DateFormat::YearMonthDaySlash,
        DateFormat::DayMonthYearSlash,
        DateFormat::MonthDayYearSlash,
        DateFormat::YearMonthDayDash,
        DateFormat::DayMonthYearDash,
        DateFormat::MonthDayYearDash,
        DateFormat::YearMonthDayDot,
        DateFormat::DayMonthYearDot,
        DateFormat::MonthDayYearDot,
    ];

    /// Look up a host identifier such as `"YYYY-MM-DD"`
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        DATE_FORMATS.get(identifier.trim()).copied()
    }

    /// Look up a host identifier, falling back to `YYYY/MM/DD` when unknown
    pub fn from_identifier_or_default(identifier: &str) -> Self {
        Self::from_identifier(identifier).unwrap_or_else(|| {
            warn!("FORMAT: Unrecognized date format {:?}, using {}", identifier, Self::default());
            Self::default()
        })
    }

    pub fn identifier(self) -> &'static str {
        match self {
            DateFormat::YearMonthDaySlash => "YYYY/MM/DD",
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
            DateFormat::MonthDayYearSlash => "MM/DD/YYYY",
            DateFormat::YearMonthDayDash => "YYYY-MM-DD",
            DateFormat::DayMonthYearDash => "DD-MM-YYYY",
            DateFormat::MonthDayYearDash => "MM-DD-YYYY",
            DateFormat::YearMonthDayDot => "YYYY.MM.DD",
            DateFormat::DayMonthYearDot => "DD.MM.YYYY",
            DateFormat::MonthDayYearDot => "MM.DD.YYYY",
        }
    }

    /// chrono strftime pattern for this format
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::YearMonthDaySlash => "%Y/%m/%d",
            DateFormat::DayMonthYearSlash => "%d/%m/%Y",
            DateFormat::MonthDayYearSlash => "%m/%d/%Y",
            DateFormat::YearMonthDayDash => "%Y-%m-%d",
            DateFormat::DayMonthYearDash => "%d-%m-%Y",
            DateFormat::MonthDayYearDash => "%m-%d-%Y",
            DateFormat::YearMonthDayDot => "%Y.%m.%d",
            DateFormat::DayMonthYearDot => "%d.%m.%Y",
            DateFormat::MonthDayYearDot => "%m.%d.%Y",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Format a date for display in the input field
pub fn format_display(date: NaiveDate, format: DateFormat) -> String {
    date.format(format.pattern()).to_string()
}

/// Canonical `YYYY-MM-DD` value built from the calendar components
///
/// The date has no time or zone attached, so there is no UTC shift that
/// could move it to a neighbouring day.
pub fn to_canonical(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a canonical value; a trailing time part (`2024-01-15T00:00:00`) is ignored
pub fn parse_canonical(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, CANONICAL_PATTERN).ok()
}

/// Calendar caption, e.g. `2024年1月`
pub fn month_caption(date: NaiveDate) -> String {
    format!("{}年{}月", date.year(), date.month())
}

/// Box-drawing characters for borders
#[derive(Debug, Clone, PartialEq)]
pub struct BoxChars {
    pub horizontal: &'static str,
    pub vertical: &'static str,
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub shadow: &'static str,
    pub dropdown: &'static str,
}

impl BoxChars {
    pub fn unicode() -> Self {
        Self {
            horizontal: "─",
            vertical: "│",
            top_left: "╭",
            top_right: "╮",
            bottom_left: "╰",
            bottom_right: "╯",
            shadow: "░",
            dropdown: "▾",
        }
    }

    pub fn ascii() -> Self {
        Self {
            horizontal: "-",
            vertical: "|",
            top_left: "+",
            top_right: "+",
            bottom_left: "+",
            bottom_right: "+",
            shadow: ":",
            dropdown: "v",
        }
    }

    pub fn from_use_unicode(use_unicode: bool) -> Self {
        if use_unicode {
            Self::unicode()
        } else {
            Self::ascii()
        }
    }

    /// Border set for ratatui blocks
    pub fn border_set(&self) -> border::Set {
        border::Set {
            top_left: self.top_left,
            top_right: self.top_right,
            bottom_left: self.bottom_left,
            bottom_right: self.bottom_right,
            vertical_left: self.vertical,
            vertical_right: self.vertical,
            horizontal_top: self.horizontal,
            horizontal_bottom: self.horizontal,
        }
    }
}
