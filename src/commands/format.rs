use anyhow::{bail, Result};
use chrono::Datelike;

use crate::formatting::{format_display, month_caption, to_canonical, DateFormat, WEEKDAY_LABELS};

use super::parse_date_arg;

/// Show how a date is displayed and emitted
///
/// With no format every supported format is listed.
pub fn run(date: &str, format: Option<&str>) -> Result<()> {
    print!("{}", render(date, format)?);
    Ok(())
}

pub fn render(date: &str, format: Option<&str>) -> Result<String> {
    let date = parse_date_arg(date)?;
    let formats = match format {
        Some(identifier) => match DateFormat::from_identifier(identifier) {
            Some(format) => vec![format],
            None => bail!("Unknown format '{}'", identifier),
        },
        None => DateFormat::ALL.to_vec(),
    };

    let weekday = WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize];
    let mut out = String::new();
    out.push_str(&format!("Canonical: {}\n", to_canonical(date)));
    out.push_str(&format!("Calendar:  {} ({})\n", month_caption(date), weekday));
    for format in formats {
        out.push_str(&format!("{:<11} {}\n", format.identifier(), format_display(date, format)));
    }
    Ok(out)
}
