use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::formatting::{parse_canonical, DateFormat};

/// Argument bundle delivered by the host on every render
///
/// Every field is optional on the wire; missing fields take the documented
/// defaults and malformed values degrade to "absent" rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(deserialize_with = "deserialize_text")]
    pub label: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub value: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub min_value: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub max_value: Option<String>,
    #[serde(deserialize_with = "deserialize_format")]
    pub format: DateFormat,
    #[serde(deserialize_with = "deserialize_flag")]
    pub disabled: bool,
    #[serde(deserialize_with = "deserialize_width")]
    pub width: WidthSpec,
    #[serde(deserialize_with = "deserialize_flag")]
    pub sidebar_mode: bool,
}

impl Configuration {
    /// Label text, `None` when absent or blank
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.trim().is_empty())
    }

    /// Initially selected date
    pub fn selected_date(&self) -> Option<NaiveDate> {
        parse_field("value", self.value.as_deref())
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        parse_field("min_value", self.min_value.as_deref())
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        parse_field("max_value", self.max_value.as_deref())
    }

    /// Inclusive selectable range
    pub fn bounds(&self) -> DateBounds {
        DateBounds {
            min: self.min_date(),
            max: self.max_date(),
        }
    }
}

fn parse_field(name: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    let parsed = parse_canonical(raw);
    if parsed.is_none() {
        warn!("ARGS: Ignoring unparseable {} {:?}", name, raw);
    }
    parsed
}

/// Inclusive date range; a missing side is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateBounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min.map_or(true, |min| date >= min) && self.max.map_or(true, |max| date <= max)
    }

    /// Nearest selectable date to `date`
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        let date = self.min.map_or(date, |min| date.max(min));
        self.max.map_or(date, |max| date.min(max))
    }
}

/// Horizontal sizing of the widget container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthSpec {
    /// Fill the available width
    #[default]
    Stretch,
    /// Fill the available width up to this many pixels
    Pixels(u32),
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => {
            warn!("ARGS: Ignoring non-text value {}", other);
            None
        }
    })
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        other => {
            warn!("ARGS: Expected a boolean, got {}; using false", other);
            false
        }
    })
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<DateFormat, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => DateFormat::default(),
        Value::String(id) => DateFormat::from_identifier_or_default(&id),
        other => {
            warn!("ARGS: Unsupported format {}, using {}", other, DateFormat::default());
            DateFormat::default()
        }
    })
}

fn deserialize_width<'de, D>(deserializer: D) -> Result<WidthSpec, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let pixels = match &raw {
        Value::Null => return Ok(WidthSpec::Stretch),
        Value::String(text) if text == "stretch" => return Ok(WidthSpec::Stretch),
        Value::Number(number) => match number.as_u64() {
            Some(px) => u32::try_from(px).ok(),
            None => number
                .as_f64()
                .filter(|px| *px >= 1.0 && *px <= f64::from(u32::MAX))
                .map(|px| px.round() as u32),
        },
        _ => None,
    };
    Ok(match pixels {
        Some(px) if px > 0 => WidthSpec::Pixels(px),
        _ => {
            warn!("ARGS: Unsupported width {}, stretching", raw);
            WidthSpec::Stretch
        }
    })
}
