pub mod app;
pub mod date_input;
pub mod status_bar;

pub use app::App;
pub use date_input::{DateInput, DateInputProps};
pub use status_bar::{StatusBar, StatusBarProps};
