use reqwest::{header, Client, RequestBuilder};
use tracing::{debug, info};

use super::error::{ApiError, ApiResult};
use super::types::*;
use crate::config::Config;

/// Thin wrapper over the course-planning backend's REST API
pub struct PlannerClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl PlannerClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let token = config
            .api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::NotConfigured("API token not set"))?;

        if config.api_base_url.trim().is_empty() {
            return Err(ApiError::NotConfigured("backend URL not set"));
        }

        let client = Client::builder().build().map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: config.api_url(),
            auth_header: format!("Bearer {}", token),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        debug!(endpoint, "GET");
        self.send_json(self.client.get(self.url(endpoint))).await
    }

    /// Degree requirements for the signed-in student
    pub async fn get_requirements(&self) -> ApiResult<Vec<GraduationRequirement>> {
        self.get("/degree-requirements").await
    }

    /// Ask the backend to build a schedule, leaving out the given section ids
    pub async fn autogenerate_schedule(
        &self,
        semester: &str,
        discarded_section_ids: &[i64],
    ) -> ApiResult<AutogenerateScheduleResponse> {
        let query = schedule_query(semester, discarded_section_ids);
        info!(semester, discarded = discarded_section_ids.len(), "requesting generated schedule");

        let request = self
            .client
            .get(self.url("/degree-requirements/autogenerate-schedule"))
            .query(&query);
        self.send_json(request).await
    }

    pub async fn get_user_info(&self) -> ApiResult<UserInfo> {
        self.get("/user_info").await
    }

    /// Save the student's unavailability and avoid times. The backend replaces the
    /// whole profile, so the rest of `info` is sent back unchanged.
    pub async fn set_time_preferences(&self, info: &UserInfo) -> ApiResult<()> {
        let body = SetUserInfoRequest::from(info);
        debug!(
            unavailable = body.unavailability_times.len(),
            avoid = body.avoid_times.len(),
            "POST /user_info"
        );

        let response = self
            .client
            .post(self.url("/user_info"))
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(())
    }
}

/// `semester=..` followed by one `discarded_section_ids=..` pair per id
fn schedule_query(semester: &str, discarded_section_ids: &[i64]) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(discarded_section_ids.len() + 1);
    if !semester.is_empty() {
        query.push(("semester", semester.to_string()));
    }
    query.extend(
        discarded_section_ids
            .iter()
            .map(|id| ("discarded_section_ids", id.to_string())),
    );
    query
}
