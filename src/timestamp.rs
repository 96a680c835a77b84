//! Parser for the sportsbook's human-readable placement timestamps,
//! e.g. `"9 Feb 2025 @ 4:08pm"`.
//!
//! The same pattern doubles as the structural discriminator between
//! parent-bet rows and leg rows, so `matches` is exposed separately from
//! `parse`. Unparseable text is an explicit error — never a substituted
//! current time.

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timestamp did not parse as \"<d> <Mon> <yyyy> @ <h>:<mm><am|pm>\": {text:?}")]
pub struct MalformedTimestamp {
    pub text: String,
}

pub struct TimestampParser {
    pattern: Regex,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(
                r"(?i)\b(\d{1,2})\s+([A-Za-z]{3,})\s+(\d{4})\s+@\s+(\d{1,2}):(\d{2})\s*(am|pm)\b",
            )
            .unwrap(),
        }
    }

    /// Structural test only. A matching row is a parent-bet row even if
    /// the captured components later turn out to be out of range.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>, MalformedTimestamp> {
        let malformed = || MalformedTimestamp { text: text.to_string() };
        let caps = self.pattern.captures(text).ok_or_else(malformed)?;

        let day: u32 = caps[1].parse().map_err(|_| malformed())?;
        let month0 = month_index(&caps[2]).ok_or_else(malformed)?;
        let year: i32 = caps[3].parse().map_err(|_| malformed())?;
        let mut hour: u32 = caps[4].parse().map_err(|_| malformed())?;
        let minute: u32 = caps[5].parse().map_err(|_| malformed())?;
        let pm = caps[6].eq_ignore_ascii_case("pm");

        if pm && hour < 12 {
            hour += 12;
        } else if !pm && hour == 12 {
            hour = 0;
        }

        Utc.with_ymd_and_hms(year, month0 + 1, day, hour, minute, 0)
            .single()
            .ok_or_else(malformed)
    }

    /// Canonical re-rendering of an instant in the export's own format.
    /// `parse(render(t)) == t` for any minute-resolution instant.
    pub fn render(&self, t: DateTime<Utc>) -> String {
        t.format("%-d %b %Y @ %-I:%M%P").to_string()
    }
}

/// Case-insensitive 3-letter month abbreviation to 0-based index.
fn month_index(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = abbrev.to_ascii_lowercase();
    let key = lower.get(..3)?;
    MONTHS.iter().position(|m| *m == key).map(|i| i as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_reference_timestamp() {
        let parser = TimestampParser::new();
        let t = parser.parse("9 Feb 2025 @ 4:08pm").unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 2, 9, 16, 8, 0).unwrap();
        assert_eq!(t, expected);
    }

    #[test]
    fn meridiem_conversion() {
        let parser = TimestampParser::new();
        assert_eq!(parser.parse("1 Jan 2024 @ 12:00am").unwrap().hour(), 0);
        assert_eq!(parser.parse("1 Jan 2024 @ 12:30pm").unwrap().hour(), 12);
        assert_eq!(parser.parse("1 Jan 2024 @ 11:59pm").unwrap().hour(), 23);
        assert_eq!(parser.parse("1 Jan 2024 @ 1:00am").unwrap().hour(), 1);
    }

    #[test]
    fn month_abbreviations_case_insensitive() {
        let parser = TimestampParser::new();
        let a = parser.parse("8 Dec 2024 @ 10:32am").unwrap();
        let b = parser.parse("8 DEC 2024 @ 10:32am").unwrap();
        let c = parser.parse("8 December 2024 @ 10:32am").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn rejects_garbage_and_out_of_range() {
        let parser = TimestampParser::new();
        assert!(parser.parse("").is_err());
        assert!(parser.parse("not a date").is_err());
        assert!(parser.parse("9 Xyz 2025 @ 4:08pm").is_err());
        // day 31 does not exist in February
        assert!(parser.parse("31 Feb 2025 @ 4:08pm").is_err());
        // pattern matches but hour is out of range after conversion
        assert!(parser.parse("1 Jan 2024 @ 25:10am").is_err());
    }

    #[test]
    fn matches_is_structural_not_semantic() {
        let parser = TimestampParser::new();
        assert!(parser.matches("9 Feb 2025 @ 4:08pm"));
        assert!(parser.matches("31 Feb 2025 @ 4:08pm")); // structurally fine
        assert!(!parser.matches(""));
        assert!(!parser.matches("Josh Allen - Passing Yards"));
    }

    #[test]
    fn render_parse_roundtrip() {
        let parser = TimestampParser::new();
        let t = parser.parse("9 Feb 2025 @ 4:08pm").unwrap();
        let rendered = parser.render(t);
        assert_eq!(parser.parse(&rendered).unwrap(), t);

        let midnight = parser.parse("1 Jan 2024 @ 12:00am").unwrap();
        assert_eq!(parser.parse(&parser.render(midnight)).unwrap(), midnight);
    }
}
