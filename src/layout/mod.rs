//! Timeline layout engine.
//!
//! Turns a generated schedule into five day rows of positioned blocks. Every call
//! starts from nothing: the window, the blocks and the summary are all derived from
//! the payload passed in, so a new schedule never sees leftovers from the last one.

mod blocks;
mod ticks;
mod time;
mod window;

use std::collections::HashSet;

use serde::Serialize;

use crate::api::{AutogenerateScheduleResponse, Section};

pub use blocks::{day_index, BlockKind, DayBuckets, ScheduleBlock, AVOID_LABEL, BUSY_LABEL, DAYS_PER_WEEK, DAY_NAMES};
pub use ticks::{hour_marks, ruler, HourMark, RulerRange};
pub use time::{
    format_display_range, format_display_time, hhmm_to_time_input, hour_label, parse_hour_label, parse_time_input,
    parse_time_of_day, time_input_to_hhmm, to_percent_of_day, TimeOfDay,
};
pub use window::{VisibleWindow, WindowBuilder};

/// Per-section info shown beside the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub id: Option<i64>,
    pub course_code: String,
    pub title: String,
    pub requirement_labels: Vec<String>,
}

impl From<&Section> for SectionSummary {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id,
            course_code: section.course_code.clone(),
            title: section.title.clone(),
            requirement_labels: section.requirement_labels.clone(),
        }
    }
}

/// Output of one layout pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleLayout {
    pub per_day: DayBuckets,
    pub visible_window: VisibleWindow,
    pub sections_summary: Vec<SectionSummary>,
}

impl ScheduleLayout {
    /// Layout of a schedule with nothing in it
    pub fn empty() -> Self {
        layout_schedule(&AutogenerateScheduleResponse::default())
    }
}

impl Default for ScheduleLayout {
    fn default() -> Self {
        Self::empty()
    }
}

/// Lay out a generated schedule.
///
/// Sections listed in `discarded_section_ids` are skipped. Items on days outside
/// Monday..Friday are dropped and don't widen the window. Within a day, blocks
/// appear as sections, then unavailability, then avoid ranges.
pub fn layout_schedule(schedule: &AutogenerateScheduleResponse) -> ScheduleLayout {
    let discarded: HashSet<i64> = schedule.discarded_section_ids.iter().copied().collect();
    let sections: Vec<&Section> = schedule
        .sections
        .iter()
        .filter(|s| s.id.map_or(true, |id| !discarded.contains(&id)))
        .collect();

    let mut bounds = WindowBuilder::new();
    for section in &sections {
        for meeting in section.meeting_times.iter().filter(|m| day_index(m.day).is_some()) {
            bounds.include(&meeting.start_time, &meeting.end_time);
        }
    }
    for slot in schedule
        .unavailability_times
        .iter()
        .chain(&schedule.avoid_times)
        .filter(|s| day_index(s.day).is_some())
    {
        bounds.include(&slot.start, &slot.end);
    }
    let window = bounds.finish();

    let mut per_day = DayBuckets::new();
    for section in &sections {
        per_day.place_section(section, &window);
    }
    for slot in &schedule.unavailability_times {
        per_day.place_range(BlockKind::Unavailable, slot, &window);
    }
    for slot in &schedule.avoid_times {
        per_day.place_range(BlockKind::Avoid, slot, &window);
    }

    tracing::debug!(
        sections = sections.len(),
        blocks = per_day.total_blocks(),
        window_min = window.min,
        window_max = window.max,
        "schedule laid out"
    );

    ScheduleLayout {
        per_day,
        visible_window: window,
        sections_summary: sections.into_iter().map(SectionSummary::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MeetingTime, TimeSlot};

    fn section(id: i64, code: &str, meetings: &[(i32, &str, &str)]) -> Section {
        Section {
            id: Some(id),
            crn: String::new(),
            instructor_names: vec![],
            campus_code: String::new(),
            description: String::new(),
            title: format!("{} title", code),
            course_code: code.to_string(),
            semester: String::new(),
            requirement_labels: vec!["Core".to_string()],
            meeting_times: meetings
                .iter()
                .map(|(day, s, e)| MeetingTime { day: *day, start_time: s.to_string(), end_time: e.to_string() })
                .collect(),
        }
    }

    fn slot(day: i32, start: &str, end: &str) -> TimeSlot {
        TimeSlot { day, start: start.to_string(), end: end.to_string() }
    }

    #[test]
    fn empty_schedule() {
        let layout = layout_schedule(&AutogenerateScheduleResponse::default());
        assert!(layout.per_day.iter().all(Vec::is_empty));
        assert_eq!(layout.per_day.iter().count(), DAYS_PER_WEEK);
        assert_eq!(layout.visible_window, VisibleWindow::default_padded());
        assert!(layout.sections_summary.is_empty());
    }

    #[test]
    fn day_order_is_sections_then_busy_then_avoid() {
        let schedule = AutogenerateScheduleResponse {
            sections: vec![section(1, "CSCI 1300", &[(2, "1000", "1050")])],
            unavailability_times: vec![slot(2, "0900", "1100")],
            avoid_times: vec![slot(2, "0800", "0900")],
            discarded_section_ids: vec![],
        };
        let layout = layout_schedule(&schedule);
        let kinds: Vec<BlockKind> = layout.per_day[2].iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BlockKind::Section, BlockKind::Unavailable, BlockKind::Avoid]);
    }

    #[test]
    fn invalid_days_do_not_widen_window() {
        let schedule = AutogenerateScheduleResponse {
            sections: vec![section(1, "CSCI 1300", &[(5, "0500", "2300"), (0, "0900", "0950")])],
            unavailability_times: vec![slot(-1, "0100", "0200")],
            avoid_times: vec![slot(6, "2200", "2330")],
            discarded_section_ids: vec![],
        };
        let layout = layout_schedule(&schedule);
        assert_eq!(layout.visible_window, VisibleWindow::default_padded());
        assert_eq!(layout.per_day.total_blocks(), 1);
        assert_eq!(layout.per_day[0].len(), 1);
    }

    #[test]
    fn discarded_sections_are_skipped() {
        let schedule = AutogenerateScheduleResponse {
            sections: vec![
                section(1, "CSCI 1300", &[(0, "0600", "0700")]),
                section(2, "MATH 1510", &[(1, "1000", "1100")]),
            ],
            discarded_section_ids: vec![1],
            ..Default::default()
        };
        let layout = layout_schedule(&schedule);
        assert_eq!(layout.sections_summary.len(), 1);
        assert_eq!(layout.sections_summary[0].course_code, "MATH 1510");
        assert!(layout.per_day[0].is_empty());
        assert_eq!(layout.visible_window, VisibleWindow::default_padded());
    }

    #[test]
    fn sections_without_id_are_never_discarded() {
        let mut s = section(0, "ENGL 1900", &[(4, "1400", "1515")]);
        s.id = None;
        let schedule = AutogenerateScheduleResponse {
            sections: vec![s],
            discarded_section_ids: vec![0],
            ..Default::default()
        };
        let layout = layout_schedule(&schedule);
        assert_eq!(layout.sections_summary.len(), 1);
        assert_eq!(layout.per_day[4].len(), 1);
    }

    #[test]
    fn summary_carries_requirement_labels() {
        let schedule = AutogenerateScheduleResponse {
            sections: vec![section(9, "PHIL 1050", &[])],
            ..Default::default()
        };
        let layout = layout_schedule(&schedule);
        assert_eq!(
            layout.sections_summary,
            vec![SectionSummary {
                id: Some(9),
                course_code: "PHIL 1050".into(),
                title: "PHIL 1050 title".into(),
                requirement_labels: vec!["Core".into()],
            }]
        );
        assert!(layout.per_day.is_empty());
    }
}
