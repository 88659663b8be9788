//! Display formatting shared by the views and the exports.

use chrono::{DateTime, TimeZone};

/// Formats a confidence in [0,1] as a percentage with one decimal, e.g. `87.3%`.
pub fn format_percent(confidence: f64) -> String {
    let pct = confidence * 100.0;
    format!("{:.1}%", (pct * 10.0).round() / 10.0)
}

/// Local wall clock as `HH:MM`.
pub fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M").to_string()
}

/// Date portion of an ISO 8601 timestamp (everything before `T`).
pub fn start_date(iso: &str) -> &str {
    iso.split('T').next().unwrap_or(iso)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rstest::rstest;

    #[rstest]
    #[case(0.873, "87.3%")]
    #[case(1.0, "100.0%")]
    #[case(0.0, "0.0%")]
    #[case(0.5, "50.0%")]
    #[case(0.12345, "12.3%")]
    #[case(0.9999, "100.0%")]
    fn percent_has_one_decimal(#[case] confidence: f64, #[case] expected: &str) {
        assert_eq!(format_percent(confidence), expected);
    }

    #[test]
    fn clock_is_hours_and_minutes() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let at = tz.with_ymd_and_hms(2024, 3, 9, 7, 5, 59).unwrap();
        assert_eq!(format_clock(&at), "07:05");
    }

    #[rstest]
    #[case("2024-01-02T03:04:05", "2024-01-02")]
    #[case("2024-01-02", "2024-01-02")]
    #[case("", "")]
    fn start_date_strips_time(#[case] iso: &str, #[case] expected: &str) {
        assert_eq!(start_date(iso), expected);
    }
}
