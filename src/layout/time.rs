//! Time parsing and formatting for the backend's `"HHMM"` time strings

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Minutes in one day
pub const MINUTES_PER_DAY: u16 = 1440;

/// Fallback sent to the backend when a preference time field is left empty
pub const DEFAULT_PREFERENCE_HHMM: &str = "0900";

/// Fallback shown in a preference time input when the stored value is unusable
pub const DEFAULT_PREFERENCE_INPUT: &str = "09:00";

/// A wall-clock time within one day, stored as minutes since midnight (0..1440)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from hours and minutes, `None` if out of range
    pub fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(TimeOfDay(hours * 60 + minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

/// Split a strict 4-digit "HHMM" string into (hours, minutes)
fn split_hhmm(s: &str) -> Option<(u16, u16)> {
    let bytes = s.as_bytes();
    if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let hours = s[..2].parse::<u16>().ok()?;
    let minutes = s[2..].parse::<u16>().ok()?;
    (hours <= 23 && minutes <= 59).then_some((hours, minutes))
}

/// Parse a backend time string like "0900" into minutes since midnight.
/// Anything that is not exactly four digits of a valid time becomes midnight,
/// so one bad record never aborts a layout pass.
pub fn parse_time_of_day(s: &str) -> TimeOfDay {
    match split_hhmm(s).and_then(|(h, m)| TimeOfDay::from_hm(h, m)) {
        Some(t) => t,
        None => {
            if !s.is_empty() {
                tracing::debug!(input = s, "unparseable time, using 0000");
            }
            TimeOfDay::MIDNIGHT
        }
    }
}

/// `(minutes / 1440) * 100`
pub fn to_percent_of_day(t: TimeOfDay) -> f64 {
    f64::from(t.minutes()) / f64::from(MINUTES_PER_DAY) * 100.0
}

/// Format "HHMM" as a 12-hour clock string: "1330" -> "1:30 PM", "0000" -> "12:00 AM".
/// Empty input gives an empty string; other malformed input is returned as-is.
pub fn format_display_time(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    split_hhmm(s)
        .and_then(|(h, m)| NaiveTime::from_hms_opt(u32::from(h), u32::from(m), 0))
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|| s.to_string())
}

/// "9:05 AM - 9:55 AM"
pub fn format_display_range(start: &str, end: &str) -> String {
    format!("{} - {}", format_display_time(start), format_display_time(end))
}

/// Parse what a student typed into a preference time field: "9:00", "09:00" or "0900"
pub fn parse_time_input(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H%M"))
        .ok()
}

/// Convert a preference input "HH:MM" to the backend's zero-padded "HHMM".
/// Empty or unreadable input falls back to 09:00, the default scheduling preference.
pub fn time_input_to_hhmm(input: &str) -> String {
    match parse_time_input(input) {
        Some(t) => t.format("%H%M").to_string(),
        None => {
            if !input.trim().is_empty() {
                tracing::debug!(input, "unreadable preference time, using 0900");
            }
            DEFAULT_PREFERENCE_HHMM.to_string()
        }
    }
}

/// Convert a backend "HHMM" into the "HH:MM" shown in a preference input
pub fn hhmm_to_time_input(hhmm: &str) -> String {
    if hhmm.len() != 4 || !hhmm.is_ascii() {
        return DEFAULT_PREFERENCE_INPUT.to_string();
    }
    format!("{}:{}", &hhmm[..2], &hhmm[2..])
}

/// Parse an hour mark label like "8am", "12pm" or "11pm" into a 24-hour hour
pub fn parse_hour_label(label: &str) -> Option<u16> {
    let label = label.trim().to_lowercase();
    let (digits, is_pm) = if let Some(d) = label.strip_suffix("pm") {
        (d, true)
    } else if let Some(d) = label.strip_suffix("am") {
        (d, false)
    } else {
        return None;
    };

    let hour = digits.parse::<u16>().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }

    Some(match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    })
}

/// Label for a 24-hour hour in the ruler style: 0 -> "12am", 13 -> "1pm"
pub fn hour_label(hour: u16) -> String {
    let suffix = if hour >= 12 { "pm" } else { "am" };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}{}", h12, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_backend_times() {
        assert_eq!(parse_time_of_day("0900").minutes(), 540);
        assert_eq!(parse_time_of_day("2359").minutes(), 1439);
        assert_eq!(parse_time_of_day("0000").minutes(), 0);
        assert_eq!(parse_time_of_day("1245").minutes(), 765);
    }

    #[test]
    fn malformed_times_fall_back_to_midnight() {
        for bad in ["", "900", "09:00", "2400", "0960", "ab12", "12345", "０９００"] {
            assert_eq!(parse_time_of_day(bad), TimeOfDay::MIDNIGHT, "input {:?}", bad);
        }
    }

    #[test]
    fn percent_of_day() {
        assert_eq!(to_percent_of_day(TimeOfDay::MIDNIGHT), 0.0);
        assert!((to_percent_of_day(parse_time_of_day("1200")) - 50.0).abs() < 1e-9);
        assert!((to_percent_of_day(parse_time_of_day("0800")) - 33.333_333).abs() < 1e-5);
        assert!((to_percent_of_day(parse_time_of_day("1700")) - 70.833_333).abs() < 1e-5);
    }

    #[test]
    fn display_times() {
        assert_eq!(format_display_time("1330"), "1:30 PM");
        assert_eq!(format_display_time("0905"), "9:05 AM");
        assert_eq!(format_display_time("0000"), "12:00 AM");
        assert_eq!(format_display_time("1200"), "12:00 PM");
        assert_eq!(format_display_time("2359"), "11:59 PM");
        assert_eq!(format_display_time(""), "");
        assert_eq!(format_display_time("9am"), "9am");
        assert_eq!(format_display_range("0900", "0950"), "9:00 AM - 9:50 AM");
    }

    #[test]
    fn preference_input_conversion() {
        assert_eq!(time_input_to_hhmm("09:00"), "0900");
        assert_eq!(time_input_to_hhmm("17:30"), "1730");
        assert_eq!(time_input_to_hhmm("00:00"), "0000");
        assert_eq!(time_input_to_hhmm(""), "0900");
        assert_eq!(time_input_to_hhmm("   "), "0900");
        assert_eq!(time_input_to_hhmm("9:00"), "0900");
        assert_eq!(time_input_to_hhmm(" 7:05 "), "0705");
        assert_eq!(time_input_to_hhmm("1730"), "1730");
        assert_eq!(time_input_to_hhmm("9am"), "0900");
        assert_eq!(time_input_to_hhmm("25:00"), "0900");
        assert_eq!(parse_time_of_day(&time_input_to_hhmm("9:00")).minutes(), 540);

        assert!(parse_time_input("9:00").is_some());
        assert!(parse_time_input("9am").is_none());
        assert!(parse_time_input("").is_none());

        assert_eq!(hhmm_to_time_input("0715"), "07:15");
        assert_eq!(hhmm_to_time_input("2359"), "23:59");
        assert_eq!(hhmm_to_time_input(""), "09:00");
        assert_eq!(hhmm_to_time_input("900"), "09:00");
    }

    #[test]
    fn hour_labels() {
        assert_eq!(parse_hour_label("12am"), Some(0));
        assert_eq!(parse_hour_label("8am"), Some(8));
        assert_eq!(parse_hour_label("12pm"), Some(12));
        assert_eq!(parse_hour_label("5pm"), Some(17));
        assert_eq!(parse_hour_label("11pm"), Some(23));
        assert_eq!(parse_hour_label("13pm"), None);
        assert_eq!(parse_hour_label("noon"), None);

        for hour in 0..24 {
            assert_eq!(parse_hour_label(&hour_label(hour)), Some(hour));
        }
    }

    proptest! {
        #[test]
        fn percent_is_monotonic(a in 0u16..1440, b in 0u16..1440) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = TimeOfDay::from_hm(lo / 60, lo % 60).unwrap();
            let hi = TimeOfDay::from_hm(hi / 60, hi % 60).unwrap();
            prop_assert!(to_percent_of_day(lo) <= to_percent_of_day(hi));
        }

        #[test]
        fn formatted_times_reparse(h in 0u16..24, m in 0u16..60) {
            let hhmm = format!("{:02}{:02}", h, m);
            prop_assert_eq!(parse_time_of_day(&hhmm).minutes(), h * 60 + m);
            prop_assert_eq!(time_input_to_hhmm(&hhmm_to_time_input(&hhmm)), hhmm);
        }
    }
}
