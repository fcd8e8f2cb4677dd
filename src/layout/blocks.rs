//! Positioned timeline blocks and per-day bucketing

use serde::Serialize;

use super::time::{parse_time_of_day, to_percent_of_day};
use super::window::VisibleWindow;
use crate::api::{Section, TimeSlot};

/// Monday through Friday
pub const DAYS_PER_WEEK: usize = 5;

pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

pub const BUSY_LABEL: &str = "Busy";
pub const AVOID_LABEL: &str = "Avoid";

/// Validate a raw day number from the backend. Weekend and garbage days yield `None`.
pub fn day_index(day: i32) -> Option<usize> {
    usize::try_from(day).ok().filter(|d| *d < DAYS_PER_WEEK)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Section,
    Unavailable,
    Avoid,
}

/// A rectangle on one day's timeline, positioned relative to the visible window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub instructors: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub left_percent: f64,
    pub width_percent: f64,
}

impl ScheduleBlock {
    fn positioned(kind: BlockKind, label: &str, start: &str, end: &str, window: &VisibleWindow) -> Self {
        let start_pct = to_percent_of_day(parse_time_of_day(start));
        let end_pct = to_percent_of_day(parse_time_of_day(end));

        Self {
            kind,
            label: label.to_string(),
            section_id: None,
            course_code: None,
            title: None,
            instructors: Vec::new(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            left_percent: window.project(start_pct),
            width_percent: window.scale(end_pct - start_pct),
        }
    }

    /// Right edge within the window, 0..100 for well-formed blocks
    pub fn right_percent(&self) -> f64 {
        self.left_percent + self.width_percent
    }
}

/// Five day buckets; blocks keep insertion order within a day
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayBuckets([Vec<ScheduleBlock>; DAYS_PER_WEEK]);

impl DayBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block, silently dropping days outside Monday..Friday
    fn push(&mut self, day: i32, block: ScheduleBlock) -> bool {
        match day_index(day) {
            Some(d) => {
                self.0[d].push(block);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<ScheduleBlock>> {
        self.0.iter()
    }

    pub fn total_blocks(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_blocks() == 0
    }

    /// Place every meeting time of a section
    pub fn place_section(&mut self, section: &Section, window: &VisibleWindow) {
        for meeting in &section.meeting_times {
            let mut block = ScheduleBlock::positioned(
                BlockKind::Section,
                &section.course_code,
                &meeting.start_time,
                &meeting.end_time,
                window,
            );
            block.section_id = section.id;
            block.course_code = Some(section.course_code.clone());
            block.title = Some(section.title.clone());
            block.instructors = section.instructor_names.clone();
            self.push(meeting.day, block);
        }
    }

    /// Place an unavailability or avoid slot
    pub fn place_range(&mut self, kind: BlockKind, slot: &TimeSlot, window: &VisibleWindow) {
        let label = match kind {
            BlockKind::Avoid => AVOID_LABEL,
            _ => BUSY_LABEL,
        };
        let block = ScheduleBlock::positioned(kind, label, &slot.start, &slot.end, window);
        if !self.push(slot.day, block) {
            tracing::trace!(day = slot.day, ?kind, "dropping range outside Monday-Friday");
        }
    }
}

impl std::ops::Index<usize> for DayBuckets {
    type Output = Vec<ScheduleBlock>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
