//! Date helpers for catalog dates, timestamps and clock display
//!
//! Catalog dates are free text written by people ("28th Aug 2025",
//! "August 3rd, 2024", "2025-08-28"). Sorting needs them as instants, so
//! anything that cannot be read collapses to the Unix epoch.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

const DATE_FORMATS: &[&str] = &["%d %B %Y", "%B %d %Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Parse a human-written catalog date, falling back to the Unix epoch
pub fn normalize_date(raw: &str) -> DateTime<Utc> {
    parse_catalog_date(raw).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parse a human-written catalog date
pub fn parse_catalog_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    let cleaned = trimmed
        .split_whitespace()
        .map(|token| strip_ordinal(token.trim_end_matches(',')))
        .collect::<Vec<_>>()
        .join(" ");

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .map(midnight_utc)
}

/// Parse a persisted `lastPlayed` value (RFC 3339 or bare `YYYY-MM-DD`)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(midnight_utc)
}

/// Format seconds as `h:mm:ss`, or `m:ss` under an hour
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// "28th" -> "28"; leaves anything else alone
fn strip_ordinal(token: &str) -> &str {
    for suffix in ["st", "nd", "rd", "th"] {
        if let Some(number) = token.strip_suffix(suffix) {
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                return number;
            }
        }
    }
    token
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_ordinal_day_month_year() {
        let dt = normalize_date("28th Aug 2025");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 8, 28));

        let dt = normalize_date("1st September 2024");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 9, 1));

        let dt = normalize_date("22nd Mar 2023");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 3, 22));
    }

    #[test]
    fn parses_month_first_with_comma() {
        let dt = normalize_date("August 3rd, 2024");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 8, 3));
    }

    #[test]
    fn parses_iso_dates() {
        let dt = normalize_date("2025-08-28");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 8, 28));

        let dt = normalize_date("2025-08-28T10:30:00Z");
        assert_eq!(dt.to_rfc3339(), "2025-08-28T10:30:00+00:00");
    }

    #[test]
    fn unparsable_falls_back_to_epoch() {
        assert_eq!(normalize_date("someday"), DateTime::UNIX_EPOCH);
        assert_eq!(normalize_date(""), DateTime::UNIX_EPOCH);
        assert_eq!(normalize_date("32nd Aug 2025"), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn ordinal_suffix_only_stripped_from_numbers() {
        assert_eq!(strip_ordinal("28th"), "28");
        assert_eq!(strip_ordinal("North"), "North");
        assert_eq!(strip_ordinal("th"), "th");
    }

    #[test]
    fn timestamp_accepts_rfc3339_and_date() {
        assert!(parse_timestamp("2025-08-28T12:00:00.000Z").is_some());
        assert_eq!(
            parse_timestamp("2025-08-28"),
            Some(Utc.with_ymd_and_hms(2025, 8, 28, 0, 0, 0).unwrap())
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn format_time_minutes_and_hours() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.4), "1:05");
        assert_eq!(format_time(3240.0), "54:00");
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(4200.0), "1:10:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-5.0), "0:00");
    }
}
