//! UI-only state kept apart from the laid-out blocks, which are never mutated.

use std::collections::HashSet;

use crate::api::{TimeSlot, UserInfo};
use crate::layout::{hhmm_to_time_input, parse_time_input, time_input_to_hhmm, ScheduleLayout, DAYS_PER_WEEK};

/// Which panels and rows are expanded
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub show_requirements: bool,
    expanded_requirements: HashSet<usize>,
    expanded_sections: HashSet<String>,
}

impl ViewState {
    pub fn toggle_requirements(&mut self) {
        self.show_requirements = !self.show_requirements;
    }

    pub fn toggle_requirement(&mut self, index: usize) {
        if !self.expanded_requirements.remove(&index) {
            self.expanded_requirements.insert(index);
        }
    }

    pub fn is_requirement_expanded(&self, index: usize) -> bool {
        self.expanded_requirements.contains(&index)
    }

    pub fn toggle_section(&mut self, course_code: &str) {
        if !self.expanded_sections.remove(course_code) {
            self.expanded_sections.insert(course_code.to_string());
        }
    }

    pub fn is_section_expanded(&self, course_code: &str) -> bool {
        self.expanded_sections.contains(course_code)
    }

    /// Requirement indices refer to the previous list, so drop them when it changes
    pub fn reset_requirements(&mut self) {
        self.expanded_requirements.clear();
    }
}

/// Hands out request numbers so only the newest schedule fetch gets applied
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// The displayed schedule plus the bookkeeping for requests that may replace it
#[derive(Debug, Default)]
pub struct ScheduleSession {
    pub layout: ScheduleLayout,
    pub has_schedule: bool,
    pub loading: bool,
    requests: RequestTracker,
}

impl ScheduleSession {
    /// Start a new request, superseding any still in flight
    pub fn begin(&mut self) -> u64 {
        self.loading = true;
        self.requests.next()
    }

    /// Swap in a finished layout. Returns false and keeps the old one if `seq` is stale.
    pub fn apply_loaded(&mut self, seq: u64, layout: ScheduleLayout) -> bool {
        if !self.requests.is_current(seq) {
            return false;
        }
        self.layout = layout;
        self.has_schedule = true;
        self.loading = false;
        true
    }

    /// Record a failed request. Returns false if `seq` is stale and the error should be ignored.
    pub fn apply_failed(&mut self, seq: u64) -> bool {
        if !self.requests.is_current(seq) {
            return false;
        }
        self.loading = false;
        true
    }
}

/// One editable row of the time preferences form; times are "HH:MM"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInput {
    pub day: usize,
    pub start: String,
    pub end: String,
}

impl Default for SlotInput {
    fn default() -> Self {
        Self { day: 0, start: "09:00".to_string(), end: "17:00".to_string() }
    }
}

impl SlotInput {
    /// Blank fields are fine (they save as 09:00); anything else must read as a time
    pub fn field_is_valid(value: &str) -> bool {
        value.trim().is_empty() || parse_time_input(value).is_some()
    }

    pub fn is_valid(&self) -> bool {
        Self::field_is_valid(&self.start) && Self::field_is_valid(&self.end)
    }
}

impl From<&TimeSlot> for SlotInput {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            day: usize::try_from(slot.day).unwrap_or(0).min(DAYS_PER_WEEK - 1),
            start: hhmm_to_time_input(&slot.start),
            end: hhmm_to_time_input(&slot.end),
        }
    }
}

impl From<&SlotInput> for TimeSlot {
    fn from(input: &SlotInput) -> Self {
        Self {
            day: input.day as i32,
            start: time_input_to_hhmm(&input.start),
            end: time_input_to_hhmm(&input.end),
        }
    }
}

/// Editable copy of the student's unavailability and avoid times
#[derive(Debug, Clone, Default)]
pub struct PreferenceForm {
    pub unavailable: Vec<SlotInput>,
    pub avoid: Vec<SlotInput>,
    base: UserInfo,
}

impl PreferenceForm {
    pub fn from_user_info(info: UserInfo) -> Self {
        Self {
            unavailable: info.unavailability_times.iter().map(SlotInput::from).collect(),
            avoid: info.avoid_times.iter().map(SlotInput::from).collect(),
            base: info,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.unavailable.iter().chain(&self.avoid).all(SlotInput::is_valid)
    }

    /// The loaded profile with the edited slots written back in backend format
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            unavailability_times: self.unavailable.iter().map(TimeSlot::from).collect(),
            avoid_times: self.avoid.iter().map(TimeSlot::from).collect(),
            ..self.base.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip() {
        let mut view = ViewState::default();
        assert!(!view.show_requirements);
        view.toggle_requirements();
        assert!(view.show_requirements);

        view.toggle_requirement(2);
        assert!(view.is_requirement_expanded(2));
        view.toggle_requirement(2);
        assert!(!view.is_requirement_expanded(2));

        view.toggle_section("CSCI 1300");
        assert!(view.is_section_expanded("CSCI 1300"));
        assert!(!view.is_section_expanded("CSCI 1301"));
        view.toggle_section("CSCI 1300");
        assert!(!view.is_section_expanded("CSCI 1300"));
    }

    #[test]
    fn reset_clears_requirement_rows() {
        let mut view = ViewState::default();
        view.toggle_requirement(0);
        view.toggle_section("MATH 1510");
        view.reset_requirements();
        assert!(!view.is_requirement_expanded(0));
        assert!(view.is_section_expanded("MATH 1510"));
    }

    #[test]
    fn only_latest_request_is_current() {
        let mut tracker = RequestTracker::default();
        let first = tracker.next();
        let second = tracker.next();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    fn one_day_layout(course_code: &str) -> ScheduleLayout {
        let schedule: crate::api::AutogenerateScheduleResponse = serde_json::from_str(&format!(
            r#"{{"sections": [{{"id": 1, "courseCode": "{}",
                "meetingTimes": [{{"day": 0, "startTime": "0900", "endTime": "0950"}}]}}]}}"#,
            course_code
        ))
        .unwrap();
        crate::layout::layout_schedule(&schedule)
    }

    #[test]
    fn stale_schedule_is_dropped() {
        let mut session = ScheduleSession::default();
        let first = session.begin();
        let second = session.begin();

        // The older request finishes last and must not replace anything
        assert!(session.apply_loaded(second, one_day_layout("MATH 1510")));
        assert!(!session.apply_loaded(first, one_day_layout("CSCI 1300")));
        assert_eq!(session.layout.per_day[0][0].label, "MATH 1510");
        assert!(session.has_schedule);
        assert!(!session.loading);
    }

    #[test]
    fn stale_failure_keeps_request_in_flight() {
        let mut session = ScheduleSession::default();
        let first = session.begin();
        let second = session.begin();

        assert!(!session.apply_failed(first));
        assert!(session.loading);
        assert!(!session.has_schedule);

        assert!(session.apply_failed(second));
        assert!(!session.loading);
    }

    #[test]
    fn current_schedule_is_applied() {
        let mut session = ScheduleSession::default();
        assert!(!session.has_schedule);
        let seq = session.begin();
        assert!(session.loading);
        assert!(session.apply_loaded(seq, one_day_layout("BIOL 1040")));
        assert_eq!(session.layout.sections_summary[0].course_code, "BIOL 1040");

        // A later request that fails leaves the last good layout on screen
        let next = session.begin();
        assert!(session.apply_failed(next));
        assert_eq!(session.layout.sections_summary.len(), 1);
    }

    #[test]
    fn unreadable_times_block_saving() {
        let mut form = PreferenceForm::default();
        form.avoid.push(SlotInput { day: 0, start: "9:00".into(), end: String::new() });
        assert!(form.is_valid());

        form.unavailable.push(SlotInput { day: 1, start: "9am".into(), end: "10:00".into() });
        assert!(!form.is_valid());
        assert!(!SlotInput::field_is_valid("9am"));
        assert!(SlotInput::field_is_valid("  "));

        form.unavailable[0].start = "09:00".into();
        assert!(form.is_valid());
        let out = form.to_user_info();
        assert_eq!(out.avoid_times[0], TimeSlot { day: 0, start: "0900".into(), end: "0900".into() });
    }

    #[test]
    fn preference_form_converts_times() {
        let info = UserInfo {
            name: "Sam".into(),
            degree_id: 4,
            unavailability_times: vec![TimeSlot { day: 2, start: "0730".into(), end: "bad".into() }],
            avoid_times: vec![TimeSlot { day: 9, start: "1600".into(), end: "1800".into() }],
            ..Default::default()
        };
        let mut form = PreferenceForm::from_user_info(info);
        assert_eq!(form.unavailable[0], SlotInput { day: 2, start: "07:30".into(), end: "09:00".into() });
        assert_eq!(form.avoid[0].day, 4);

        form.avoid.push(SlotInput { day: 1, start: String::new(), end: "12:15".into() });
        let out = form.to_user_info();
        assert_eq!(out.name, "Sam");
        assert_eq!(out.degree_id, 4);
        assert_eq!(out.unavailability_times[0].start, "0730");
        assert_eq!(out.unavailability_times[0].end, "0900");
        assert_eq!(out.avoid_times[1], TimeSlot { day: 1, start: "0900".into(), end: "1215".into() });
    }
}
