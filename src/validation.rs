//! Input checks shared by the dashboard routes.

use chrono::NaiveDate;

use crate::constants::TOP_PLAYER_COUNTS;

/// Accepts `YYYY-MM-DD` or the dashboard's own `MM/DD/YYYY`.
pub fn parse_search_date(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .map_err(|_| "date must be YYYY-MM-DD or MM/DD/YYYY")
}

/// Top-player tables come in fixed sizes.
pub fn validate_top_count(count: usize) -> Result<usize, &'static str> {
    if TOP_PLAYER_COUNTS.contains(&count) {
        Ok(count)
    } else {
        Err("count must be one of 10, 20 or 50")
    }
}
