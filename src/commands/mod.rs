pub mod format;
pub mod layout;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::formatting::parse_canonical;

/// Parse a canonical date argument
///
/// Accepts dates in YYYY-MM-DD format. Returns an error if the date string is
/// malformed.
pub fn parse_date_arg(date: &str) -> Result<NaiveDate> {
    parse_canonical(date)
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date))
}
