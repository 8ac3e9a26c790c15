use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_birth_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), BIRTH_DATE_FORMAT)
        .map_err(|e| anyhow!("'{}' is not a valid date: {}", input.trim(), e))
}

pub fn format_birth_date(date: &NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// The calendar date at `now` as seen in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}
