// Utility helpers for parsing and display formatting.
//
// This module centralizes all the "dirty" spreadsheet value handling so the
// rest of the code can assume clean, typed values.
use chrono::{NaiveDate, NaiveTime};
use num_format::{Locale, ToFormattedString};

/// Parse a calendar date cell, trying the formats that show up in the city
/// exports. Returns `None` for anything that cannot be safely parsed.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Parse a time-of-day cell into a canonical `HH:MM` string.
///
/// Accepts the string formats seen in the exports (24-hour, 12-hour with
/// AM/PM, dot-separated) as well as Excel day-fraction numerics like `0.375`
/// for 09:00. Returns `None` when nothing matches; the caller substitutes the
/// sentinel.
pub fn parse_time_safe(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in [
        "%H:%M:%S",
        "%H:%M",
        "%I:%M:%S %p",
        "%I:%M %p",
        "%H.%M.%S",
        "%H.%M",
    ] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Some(t.format("%H:%M").to_string());
        }
    }
    // Excel stores times as fractions of a day.
    if let Ok(frac) = s.parse::<f64>() {
        if (0.0..1.0).contains(&frac) {
            let total_seconds = (frac * 24.0 * 3600.0) as u32;
            let hours = (total_seconds / 3600) % 24;
            let minutes = (total_seconds % 3600) / 60;
            return Some(format!("{:02}:{:02}", hours, minutes));
        }
    }
    None
}

/// Round to 2 decimal places; used for every displayed percentage.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

pub fn format_pct(n: f64) -> String {
    format!("{:.2}%", n)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_date_safe(Some("2024-01-05")), Some(expected));
        assert_eq!(parse_date_safe(Some("05/01/2024")), Some(expected));
        assert_eq!(parse_date_safe(Some(" 2024-01-05 ")), Some(expected));
        assert_eq!(parse_date_safe(Some("not a date")), None);
        assert_eq!(parse_date_safe(Some("")), None);
        assert_eq!(parse_date_safe(None), None);
    }

    #[test]
    fn test_parse_time_strings() {
        assert_eq!(parse_time_safe(Some("09:30:00")), Some("09:30".to_string()));
        assert_eq!(parse_time_safe(Some("9:30 PM")), Some("21:30".to_string()));
        assert_eq!(parse_time_safe(Some("17.45")), Some("17:45".to_string()));
        assert_eq!(parse_time_safe(Some("banana")), None);
        assert_eq!(parse_time_safe(None), None);
    }

    #[test]
    fn test_parse_time_excel_fraction() {
        // 0.375 of a day is 09:00.
        assert_eq!(parse_time_safe(Some("0.375")), Some("09:00".to_string()));
        assert_eq!(parse_time_safe(Some("0.6875")), Some("16:30".to_string()));
        // Neither a valid clock time nor a day fraction.
        assert_eq!(parse_time_safe(Some("25.99")), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.0 / 3.0 * 100.0), 33.33);
        assert_eq!(round2(66.666), 66.67);
        assert_eq!(round2(50.0), 50.0);
    }
}
