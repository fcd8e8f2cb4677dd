//! Visible time window: how much of the day the timeline shows

use serde::Serialize;

use super::time::{parse_time_of_day, to_percent_of_day, TimeOfDay};

/// 08:00 and 17:00 are always on screen
pub const DEFAULT_START_HOUR: u16 = 8;
pub const DEFAULT_END_HOUR: u16 = 17;

/// Padding added on both sides of the window, in minutes
pub const PADDING_MINUTES: u16 = 60;

/// Horizontal extent of the timeline in percent-of-day units, `0 <= min < max <= 100`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibleWindow {
    pub min: f64,
    pub max: f64,
}

impl VisibleWindow {
    /// The padded 08:00 to 17:00 window used when the schedule is empty
    pub fn default_padded() -> Self {
        WindowBuilder::new().finish()
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map a full-day percentage into this window's 0..100 space
    pub fn project(&self, percent_of_day: f64) -> f64 {
        (percent_of_day - self.min) / self.span() * 100.0
    }

    /// Scale a full-day percentage length into this window's 0..100 space
    pub fn scale(&self, percent_of_day_len: f64) -> f64 {
        percent_of_day_len / self.span() * 100.0
    }

    pub fn contains_percent(&self, percent_of_day: f64) -> bool {
        percent_of_day >= self.min && percent_of_day <= self.max
    }
}

fn hour_percent(hour: u16) -> f64 {
    TimeOfDay::from_hm(hour, 0).map(to_percent_of_day).unwrap_or(0.0)
}

/// Accumulates the earliest start and latest end seen in a schedule
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowBuilder {
    earliest: Option<f64>,
    latest: Option<f64>,
}

impl WindowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one block's "HHMM" start and end
    pub fn include(&mut self, start: &str, end: &str) {
        let start = to_percent_of_day(parse_time_of_day(start));
        let end = to_percent_of_day(parse_time_of_day(end));
        self.earliest = Some(self.earliest.map_or(start, |m| m.min(start)));
        self.latest = Some(self.latest.map_or(end, |m| m.max(end)));
    }

    /// Widen to at least the default business day, pad by an hour, clamp to the day
    pub fn finish(self) -> VisibleWindow {
        let default_min = hour_percent(DEFAULT_START_HOUR);
        let default_max = hour_percent(DEFAULT_END_HOUR);
        let padding = f64::from(PADDING_MINUTES) / 1440.0 * 100.0;

        let min = self.earliest.map_or(default_min, |m| m.min(default_min));
        let max = self.latest.map_or(default_max, |m| m.max(default_max));

        VisibleWindow {
            min: (min - padding).clamp(0.0, 100.0),
            max: (max + padding).clamp(0.0, 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn pct(hhmm: &str) -> f64 {
        to_percent_of_day(parse_time_of_day(hhmm))
    }

    #[test]
    fn empty_schedule_uses_padded_business_day() {
        let w = WindowBuilder::new().finish();
        assert!((w.min - pct("0700")).abs() < EPS);
        assert!((w.max - pct("1800")).abs() < EPS);
        assert_eq!(w, VisibleWindow::default_padded());
    }

    #[test]
    fn early_and_late_blocks_widen_the_window() {
        let mut b = WindowBuilder::new();
        b.include("0600", "0700");
        b.include("2000", "2130");
        let w = b.finish();
        assert!((w.min - pct("0500")).abs() < EPS);
        assert!((w.max - pct("2230")).abs() < EPS);
    }

    #[test]
    fn window_clamps_to_the_day() {
        let mut b = WindowBuilder::new();
        b.include("0030", "2345");
        let w = b.finish();
        assert_eq!(w.min, 0.0);
        assert_eq!(w.max, 100.0);
    }

    #[test]
    fn blocks_inside_business_day_keep_default() {
        let mut b = WindowBuilder::new();
        b.include("1000", "1050");
        assert_eq!(b.finish(), VisibleWindow::default_padded());
    }

    #[test]
    fn projection() {
        let w = VisibleWindow { min: 25.0, max: 75.0 };
        assert!((w.project(25.0)).abs() < EPS);
        assert!((w.project(50.0) - 50.0).abs() < EPS);
        assert!((w.scale(5.0) - 10.0).abs() < EPS);
        assert!(w.contains_percent(30.0));
        assert!(!w.contains_percent(80.0));
    }

    proptest! {
        #[test]
        fn window_always_contains_business_day(
            blocks in proptest::collection::vec((0u16..24, 0u16..60, 0u16..24, 0u16..60), 0..12)
        ) {
            let mut b = WindowBuilder::new();
            for (sh, sm, eh, em) in &blocks {
                b.include(&format!("{:02}{:02}", sh, sm), &format!("{:02}{:02}", eh, em));
            }
            let w = b.finish();
            prop_assert!(w.min <= pct("0800"));
            prop_assert!(w.max >= pct("1700"));
            prop_assert!(w.min >= 0.0 && w.max <= 100.0);
            prop_assert!(w.span() > 0.0);
        }
    }
}
