//! Shared layout and timing constants used by the layout engine and the terminal shell.
//!
//! Sizes are CSS pixels unless the name says otherwise. The terminal shell
//! converts cells to pixels with `cell_width_px` / `cell_height_px` from the
//! configuration file.

/// Frame height requested whenever the calendar is closed
pub const DEFAULT_FRAME_HEIGHT: u32 = 80;

/// Unscaled calendar height used by the fallback estimate
pub const BASE_CALENDAR_HEIGHT: u32 = 330;

/// Input row height assumed by the fallback estimate
pub const ESTIMATED_INPUT_HEIGHT: u32 = 80;

/// Extra space added to the fallback estimate
pub const ESTIMATE_BUFFER: u32 = 30;

/// Extra space added to measured heights so the popup is not clipped
pub const MEASURED_BUFFER: u32 = 20;

/// Scale used before anything has been measured
pub const DEFAULT_CALENDAR_SCALE: f64 = 0.9;

/// Scale used when the calendar fits at its intrinsic width
pub const FULL_CALENDAR_SCALE: f64 = 1.0;

/// Lowest scale in the main content area
pub const MIN_CALENDAR_SCALE_MAIN: f64 = 0.75;

/// Lowest scale in a sidebar, kept high for legibility
pub const MIN_CALENDAR_SCALE_SIDEBAR: f64 = 0.95;

/// Below this scale the container is "very-narrow"
pub const VERY_NARROW_SCALE: f64 = 0.8;

/// Below this scale the container is "narrow"
pub const NARROW_SCALE: f64 = 0.9;

/// Intrinsic calendar width (7 day columns)
pub const CALENDAR_BASE_WIDTH: u32 = 280;

/// Horizontal padding subtracted from the effective width (5px each side)
pub const HORIZONTAL_PADDING: u32 = 10;

/// Default width of one terminal cell in pixels
pub const DEFAULT_CELL_WIDTH_PX: u32 = 10;

/// Default height of one terminal cell in pixels
pub const DEFAULT_CELL_HEIGHT_PX: u32 = 20;

/// Width of one day column at full scale
pub const DAY_COLUMN_WIDTH: u16 = 4;

/// Narrowest day column that still fits a two-digit day plus a gap
pub const MIN_DAY_COLUMN_WIDTH: u16 = 3;

/// Calendar rows: 2 borders + caption + weekday header + 6 weeks
pub const CALENDAR_ROWS: u16 = 10;

/// Height of the bordered input field
pub const INPUT_FIELD_HEIGHT: u16 = 3;

/// Height of the label row
pub const LABEL_HEIGHT: u16 = 1;

/// Interval of the focus poll while the calendar is open
pub const FOCUS_CHECK_INTERVAL_MS: u64 = 100;

/// Delay between committing a date and collapsing the calendar
pub const DATE_SELECT_CLOSE_DELAY_MS: u64 = 100;
