//! Responsive layout engine
//!
//! Pure functions that turn the measured container/frame geometry into a
//! calendar scale, a size class and a frame-height request. Every run
//! produces a complete [`LayoutSnapshot`]; callers overwrite the previous one.

use crate::layout_constants::{
    BASE_CALENDAR_HEIGHT, CALENDAR_BASE_WIDTH, DAY_COLUMN_WIDTH, DEFAULT_CALENDAR_SCALE,
    DEFAULT_CELL_HEIGHT_PX, DEFAULT_CELL_WIDTH_PX, DEFAULT_FRAME_HEIGHT, ESTIMATED_INPUT_HEIGHT,
    ESTIMATE_BUFFER, FULL_CALENDAR_SCALE, HORIZONTAL_PADDING, MEASURED_BUFFER,
    MIN_CALENDAR_SCALE_MAIN, MIN_CALENDAR_SCALE_SIDEBAR, MIN_DAY_COLUMN_WIDTH, NARROW_SCALE,
    VERY_NARROW_SCALE,
};

use super::regions::MountedRegions;

/// Multiplier applied to the calendar so it fits the available width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarScale(f64);

impl CalendarScale {
    pub const DEFAULT: CalendarScale = CalendarScale(DEFAULT_CALENDAR_SCALE);
    pub const FULL: CalendarScale = CalendarScale(FULL_CALENDAR_SCALE);

    /// Build a scale, clamped to `[0, 1]`
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, FULL_CALENDAR_SCALE))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Size class derived from this scale; never stored on its own
    pub fn size_class(self) -> SizeClass {
        SizeClass::from_scale(self.0)
    }

    /// Terminal width of one day column at this scale
    pub fn day_column_width(self) -> u16 {
        let scaled = (f64::from(DAY_COLUMN_WIDTH) * self.0).round() as u16;
        scaled.clamp(MIN_DAY_COLUMN_WIDTH, DAY_COLUMN_WIDTH)
    }
}

impl Default for CalendarScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Presentational container class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeClass {
    #[default]
    Default,
    Narrow,
    VeryNarrow,
}

impl SizeClass {
    pub fn from_scale(scale: f64) -> Self {
        if scale < VERY_NARROW_SCALE {
            SizeClass::VeryNarrow
        } else if scale < NARROW_SCALE {
            SizeClass::Narrow
        } else {
            SizeClass::Default
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Default => "",
            SizeClass::Narrow => "narrow",
            SizeClass::VeryNarrow => "very-narrow",
        }
    }

    /// Rows left empty between the input field and the popup
    pub fn popup_gap(self) -> u16 {
        match self {
            SizeClass::Default => 1,
            SizeClass::Narrow | SizeClass::VeryNarrow => 0,
        }
    }
}

/// Preferred side of the popup relative to the input field
///
/// The renderer flips to the other side when the preferred one has no room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    BottomStart,
    TopStart,
}

impl Placement {
    pub fn for_size_class(size_class: SizeClass) -> Self {
        match size_class {
            SizeClass::Default => Placement::BottomStart,
            SizeClass::Narrow | SizeClass::VeryNarrow => Placement::TopStart,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Placement::BottomStart => "bottom-start",
            Placement::TopStart => "top-start",
        }
    }
}

/// Cell-to-pixel conversion for the terminal shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelMetrics {
    pub cell_width_px: u32,
    pub cell_height_px: u32,
}

impl Default for PixelMetrics {
    fn default() -> Self {
        Self {
            cell_width_px: DEFAULT_CELL_WIDTH_PX,
            cell_height_px: DEFAULT_CELL_HEIGHT_PX,
        }
    }
}

impl PixelMetrics {
    pub fn new(cell_width_px: u32, cell_height_px: u32) -> Self {
        Self {
            cell_width_px: cell_width_px.max(1),
            cell_height_px: cell_height_px.max(1),
        }
    }

    pub fn columns_to_px(self, columns: u16) -> u32 {
        u32::from(columns) * self.cell_width_px
    }

    pub fn rows_to_px(self, rows: u16) -> u32 {
        u32::from(rows) * self.cell_height_px
    }

    /// Columns fully covered by `px`
    pub fn px_to_columns(self, px: u32) -> u16 {
        (px / self.cell_width_px).min(u32::from(u16::MAX)) as u16
    }

    /// Rows needed to show `px`, rounded up
    pub fn px_to_rows(self, px: u32) -> u16 {
        px.div_ceil(self.cell_height_px).min(u32::from(u16::MAX)) as u16
    }
}

/// Width signals feeding the scale computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutInputs {
    pub container_width_px: Option<u32>,
    pub frame_width_px: Option<u32>,
    pub sidebar_mode: bool,
}

impl LayoutInputs {
    pub fn from_regions(regions: &MountedRegions, metrics: PixelMetrics, sidebar_mode: bool) -> Self {
        Self {
            container_width_px: regions.container.map(|r| metrics.columns_to_px(r.width)),
            frame_width_px: regions.frame.map(|r| metrics.columns_to_px(r.width)),
            sidebar_mode,
        }
    }
}

/// Rendered heights used to size the frame while open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMeasurement {
    pub input_height_px: u32,
    /// Height the calendar popup adds to the container, gap and shadow included
    pub calendar_height_px: u32,
}

impl CalendarMeasurement {
    /// `None` until both the input container and the popup are mounted
    ///
    /// The popup rect is unclipped, so a frame that is still too short
    /// measures the full height it needs.
    pub fn from_regions(regions: &MountedRegions, metrics: PixelMetrics) -> Option<Self> {
        let container = regions.container?;
        let popup = regions.popup?;
        let extent = container.union(popup);
        Some(Self {
            input_height_px: metrics.rows_to_px(container.height),
            calendar_height_px: metrics.rows_to_px(extent.height.saturating_sub(container.height)),
        })
    }
}

/// Result of one layout recomputation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSnapshot {
    pub scale: CalendarScale,
    pub frame_height_px: u32,
}

impl Default for LayoutSnapshot {
    fn default() -> Self {
        Self {
            scale: CalendarScale::DEFAULT,
            frame_height_px: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl LayoutSnapshot {
    pub fn size_class(&self) -> SizeClass {
        self.scale.size_class()
    }

    pub fn placement(&self) -> Placement {
        Placement::for_size_class(self.size_class())
    }
}

/// Scale the calendar to the narrower of container and frame
pub fn compute_scale(inputs: &LayoutInputs) -> CalendarScale {
    let (container, frame) = match (inputs.container_width_px, inputs.frame_width_px) {
        (Some(container), Some(frame)) if container > 0 && frame > 0 => (container, frame),
        _ => return CalendarScale::DEFAULT,
    };

    let available = container.min(frame).saturating_sub(HORIZONTAL_PADDING);
    if available >= CALENDAR_BASE_WIDTH {
        return CalendarScale::FULL;
    }

    let floor = if inputs.sidebar_mode {
        MIN_CALENDAR_SCALE_SIDEBAR
    } else {
        MIN_CALENDAR_SCALE_MAIN
    };
    CalendarScale::new((f64::from(available) / f64::from(CALENDAR_BASE_WIDTH)).max(floor))
}

/// Frame height to request from the host
pub fn frame_height(open: bool, scale: CalendarScale, measurement: Option<CalendarMeasurement>) -> u32 {
    if !open {
        return DEFAULT_FRAME_HEIGHT;
    }
    match measurement {
        Some(m) => m.input_height_px + m.calendar_height_px + MEASURED_BUFFER,
        None => {
            let scaled_calendar = (f64::from(BASE_CALENDAR_HEIGHT) * scale.value()).ceil() as u32;
            scaled_calendar + ESTIMATED_INPUT_HEIGHT + ESTIMATE_BUFFER
        }
    }
}

/// Full recomputation from the current signals
pub fn recompute(
    inputs: &LayoutInputs,
    open: bool,
    measurement: Option<CalendarMeasurement>,
) -> LayoutSnapshot {
    let scale = compute_scale(inputs);
    LayoutSnapshot {
        scale,
        frame_height_px: frame_height(open, scale, measurement),
    }
}
