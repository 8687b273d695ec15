/// Widgets of the date input
///
/// Each widget renders itself directly to a ratatui Buffer and is wrapped in
/// the Element tree through [`ElementWidget`](crate::tui::component::ElementWidget).
/// Widgets hold plain values copied out of the state, so they can be rendered
/// into test buffers without a runtime.
pub mod calendar;
pub use calendar::{Calendar, CalendarHit};

pub mod input_field;
pub use input_field::InputField;

pub mod decoration;
pub use decoration::{FrameRule, Label, Shadow};
