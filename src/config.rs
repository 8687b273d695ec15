use phf::phf_map;
use xdg::BaseDirectories;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use ratatui::style::Color;

use crate::layout_constants::{
    DATE_SELECT_CLOSE_DELAY_MS, DEFAULT_CELL_HEIGHT_PX, DEFAULT_CELL_WIDTH_PX,
    FOCUS_CHECK_INTERVAL_MS,
};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,
    /// Focus poll interval while the calendar is open
    pub focus_poll_interval_ms: u64,
    /// Delay between committing a date and collapsing the calendar
    pub select_close_delay_ms: u64,
    /// Pixel width of one terminal cell
    pub cell_width_px: u32,
    /// Pixel height of one terminal cell
    pub cell_height_px: u32,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub use_unicode: bool,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Color,
    #[serde(deserialize_with = "deserialize_color_optional")]
    pub unfocused_selection_fg: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub muted_fg: Color,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            focus_poll_interval_ms: FOCUS_CHECK_INTERVAL_MS,
            select_close_delay_ms: DATE_SELECT_CLOSE_DELAY_MS,
            cell_width_px: DEFAULT_CELL_WIDTH_PX,
            cell_height_px: DEFAULT_CELL_HEIGHT_PX,
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    pub fn focus_poll_interval(&self) -> Duration {
        // A zero interval would make tokio's interval panic
        Duration::from_millis(self.focus_poll_interval_ms.max(1))
    }

    pub fn select_close_delay(&self) -> Duration {
        Duration::from_millis(self.select_close_delay_ms)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            use_unicode: true,
            selection_fg: Color::Rgb(255, 75, 75), // Streamlit red
            unfocused_selection_fg: None,
            muted_fg: Color::DarkGray,
        }
    }
}

impl DisplayConfig {
    /// Get the unfocused selection color, calculating 50% darker if not explicitly set
    pub fn unfocused_selection_fg(&self) -> Color {
        self.unfocused_selection_fg.unwrap_or_else(|| darken_color(self.selection_fg, 0.5))
    }
}

/// Darken a color by a given factor (0.0 = black, 1.0 = original)
fn darken_color(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let r = (r as f32 * factor) as u8;
            let g = (g as f32 * factor) as u8;
            let b = (b as f32 * factor) as u8;
            Color::Rgb(r, g, b)
        }
        // For named colors, return them as-is
        other => other,
    }
}

static NAMED_COLORS: phf::Map<&'static str, Color> = phf_map! {
    "black" => Color::Black,
    "red" => Color::Red,
    "green" => Color::Green,
    "yellow" => Color::Yellow,
    "blue" => Color::Blue,
    "magenta" => Color::Magenta,
    "cyan" => Color::Cyan,
    "gray" => Color::Gray,
    "grey" => Color::Gray,
    "darkgray" => Color::DarkGray,
    "darkgrey" => Color::DarkGray,
    "white" => Color::White,
    "orange" => Color::Rgb(255, 165, 0),
};

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_color(&raw).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", raw)))
}

fn deserialize_color_optional<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_color(&raw).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", raw)))
        })
        .transpose()
}

/// Parse a colour name, `#rgb`, `#rrggbb` or `r,g,b`
fn parse_color(raw: &str) -> Option<Color> {
    let raw = raw.trim().to_lowercase();
    if let Some(color) = NAMED_COLORS.get(raw.as_str()) {
        return Some(*color);
    }

    let channels: Vec<u8> = if let Some(hex) = raw.strip_prefix('#') {
        match hex.len() {
            3 => hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
                .collect::<Option<_>>()?,
            6 => (0..6)
                .step_by(2)
                .map(|i| hex.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
                .collect::<Option<_>>()?,
            _ => return None,
        }
    } else {
        raw.split(',')
            .map(|part| part.trim().parse::<u8>().ok())
            .collect::<Option<_>>()?
    };

    match channels[..] {
        [r, g, b] => Some(Color::Rgb(r, g, b)),
        _ => None,
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("config.toml"))
}

pub fn read() -> Config {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => return Config::default(),
    };

    // Check if file exists
    if !config_path.exists() {
        return Config::default();
    }

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };

    toml::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!("CONFIG: Ignoring invalid {}: {}", config_path.display(), e);
        Config::default()
    })
}
