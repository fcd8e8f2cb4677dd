//! Hour marks for the timeline ruler. These are full-day positions, not window-relative.

use serde::{Deserialize, Serialize};

use super::time::{hour_label, parse_hour_label, to_percent_of_day, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RulerRange {
    #[default]
    BusinessDay, // 8am..5pm
    FullDay,     // 12am..11pm
}

impl RulerRange {
    pub fn hours(self) -> std::ops::RangeInclusive<u16> {
        match self {
            RulerRange::BusinessDay => 8..=17,
            RulerRange::FullDay => 0..=23,
        }
    }

    pub fn labels(self) -> Vec<String> {
        self.hours().map(hour_label).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourMark {
    pub label: String,
    pub left_percent: f64,
}

/// Position each label at its hour as a percentage of the full day.
/// Labels that don't parse as an hour sit at 0.
pub fn hour_marks<S: AsRef<str>>(labels: &[S]) -> Vec<HourMark> {
    labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            let left_percent = parse_hour_label(label)
                .and_then(|h| TimeOfDay::from_hm(h, 0))
                .map(to_percent_of_day)
                .unwrap_or(0.0);
            HourMark { label: label.to_string(), left_percent }
        })
        .collect()
}

pub fn ruler(range: RulerRange) -> Vec<HourMark> {
    hour_marks(&range.labels())
}
