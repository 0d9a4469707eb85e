//! HTTPスケジュールフィード

use super::{FeedError, ScheduleFeed};
use async_trait::async_trait;
use inspection_common::{parse_schedule_payload, RawScheduleItem, ScheduleQuery};
use std::time::Duration;

pub struct HttpScheduleFeed {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<String>,
}

impl HttpScheduleFeed {
    pub fn new(
        base_url: impl Into<String>,
        auth_header: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            auth_header,
        })
    }

    /// `<base>/InspectionSchedule[/<id>]`
    pub fn url_for(&self, query: &ScheduleQuery) -> String {
        let base = self.base_url.trim_end_matches('/');
        match &query.id {
            Some(id) => format!("{}/InspectionSchedule/{}", base, id),
            None => format!("{}/InspectionSchedule", base),
        }
    }
}

#[async_trait]
impl ScheduleFeed for HttpScheduleFeed {
    async fn fetch(&self, query: &ScheduleQuery) -> Result<Vec<RawScheduleItem>, FeedError> {
        let url = self.url_for(query);
        let mut request = self
            .client
            .get(&url)
            .header("Content-Type", "application/json");

        if !query.fields.is_empty() {
            request = request.query(&[("fields", query.fields.join(","))]);
        }
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }

        tracing::debug!(%url, "fetching schedule");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let payload: serde_json::Value = response.json().await?;
        Ok(parse_schedule_payload(&payload)?)
    }
}
