pub mod bridge;
pub mod commands;
pub mod config;
pub mod formatting;
pub mod layout_constants;
pub mod types;
pub mod tui;
