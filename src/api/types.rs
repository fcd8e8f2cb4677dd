use serde::{Deserialize, Deserializer, Serialize};

/// Backend times may come back as `null`; treat that like a missing key so the
/// record still lays out (at 00:00) instead of failing the whole response.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One weekly recurring meeting of a section. Times are "HHMM", day 0 = Monday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTime {
    pub day: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end_time: String,
}

/// A scheduled offering of a course as returned by the schedule generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub crn: String,
    #[serde(default)]
    pub instructor_names: Vec<String>,
    #[serde(default)]
    pub campus_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub requirement_labels: Vec<String>,
    #[serde(default)]
    pub meeting_times: Vec<MeetingTime>,
}

/// A day/start/end slot, used for both unavailability and avoid preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end: String,
}

/// Response of `GET /degree-requirements/autogenerate-schedule`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutogenerateScheduleResponse {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub unavailability_times: Vec<TimeSlot>,
    #[serde(default)]
    pub avoid_times: Vec<TimeSlot>,
    #[serde(default)]
    pub discarded_section_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraduationRequirement {
    pub label: String,
    #[serde(default)]
    pub needed: u32,
    #[serde(default)]
    pub satisfying_course_codes: Vec<String>,
    #[serde(default)]
    pub satisfying_course_ids: Vec<i64>,
}

/// Response of `GET /user_info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub completed_course_ids: Vec<i64>,
    #[serde(default)]
    pub unavailability_times: Vec<TimeSlot>,
    #[serde(default)]
    pub avoid_times: Vec<TimeSlot>,
    #[serde(default)]
    pub saved_course_codes: Vec<String>,
    #[serde(default)]
    pub graduation_year: i32,
    #[serde(default)]
    pub degree_id: i64,
}

/// Body of `POST /user_info`. The backend reads snake_case here.
#[derive(Debug, Clone, Serialize)]
pub struct SetUserInfoRequest {
    pub name: String,
    pub graduation_year: i32,
    pub completed_course_ids: Vec<i64>,
    pub unavailability_times: Vec<TimeSlot>,
    pub avoid_times: Vec<TimeSlot>,
    pub degree_id: i64,
}

impl From<&UserInfo> for SetUserInfoRequest {
    fn from(info: &UserInfo) -> Self {
        Self {
            name: info.name.clone(),
            graduation_year: info.graduation_year,
            completed_course_ids: info.completed_course_ids.clone(),
            unavailability_times: info.unavailability_times.clone(),
            avoid_times: info.avoid_times.clone(),
            degree_id: info.degree_id,
        }
    }
}
