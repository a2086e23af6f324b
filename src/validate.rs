//! Input validation for values typed on the command line.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Formats without a year; the current year is filled in
const YEARLESS_FORMATS: &[&str] = &["%B %d %Y", "%b %d %Y", "%d %B %Y", "%d %b %Y"];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"));

/// Check that `email` has a `local@domain.tld` shape
pub fn ensure_email(email: &str) -> Result<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(Error::InvalidEmail(email.to_string()))
    }
}

/// Check that a display name is not blank
pub fn ensure_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument("name cannot be empty".to_string()));
    }
    Ok(())
}

/// Parse a loosely formatted due date into `YYYY-MM-DD`
pub fn parse_due_date(input: &str) -> Result<String> {
    parse_date_in_year(input, Local::now().year()).map(|date| date.format("%Y-%m-%d").to_string())
}

fn parse_date_in_year(input: &str, year: i32) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidDate(input.to_string()));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    let with_year = format!("{} {year}", trimmed.trim_end_matches(','));
    for format in YEARLESS_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, format) {
            return Ok(date);
        }
    }

    Err(Error::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_emails() {
        for email in ["alex@example.com", "a.b+c@sub.example.org", "x@y.io"] {
            ensure_email(email).unwrap_or_else(|_| panic!("{email} should be valid"));
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["alex", "alex@example", "@example.com", "a b@example.com", ""] {
            let err = ensure_email(email).unwrap_err();
            assert!(matches!(err, Error::InvalidEmail(_)), "{email} should be invalid");
        }
    }

    #[test]
    fn rejects_blank_names() {
        assert!(ensure_name("Alex").is_ok());
        assert!(matches!(ensure_name("   "), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn parses_iso_and_numeric_dates() {
        let cases = [
            ("2025-09-30", "2025-09-30"),
            ("2025/09/30", "2025-09-30"),
            ("09/30/2025", "2025-09-30"),
            ("9/3/2025", "2025-09-03"),
            ("2025-09-30T10:15:00", "2025-09-30"),
            ("2025-09-30T10:15:00+02:00", "2025-09-30"),
        ];
        for (input, expected) in cases {
            let date = parse_date_in_year(input, 2000).unwrap();
            assert_eq!(date.format("%Y-%m-%d").to_string(), expected, "{input}");
        }
    }

    #[test]
    fn parses_month_names() {
        let cases = [
            ("October 2, 2025", "2025-10-02"),
            ("Oct 2 2025", "2025-10-02"),
            ("2 Oct 2025", "2025-10-02"),
        ];
        for (input, expected) in cases {
            let date = parse_date_in_year(input, 2000).unwrap();
            assert_eq!(date.format("%Y-%m-%d").to_string(), expected, "{input}");
        }
    }

    #[test]
    fn fills_in_missing_year() {
        let date = parse_date_in_year("Oct 2", 2026).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 2).unwrap());
    }

    #[test]
    fn rejects_garbage_dates() {
        for input in ["", "soon", "2025-13-40", "32/32/2025"] {
            let err = parse_date_in_year(input, 2026).unwrap_err();
            assert!(matches!(err, Error::InvalidDate(_)), "{input}");
        }
    }

    #[test]
    fn parse_due_date_returns_iso_string() {
        assert_eq!(parse_due_date("2025-09-30").unwrap(), "2025-09-30");
    }
}
