//! JSONファイルのスケジュールフィード（オフライン確認用）

use super::{apply_query, FeedError, ScheduleFeed};
use async_trait::async_trait;
use inspection_common::{parse_schedule_payload, RawScheduleItem, ScheduleQuery};
use std::path::PathBuf;

pub struct FileScheduleFeed {
    path: PathBuf,
}

impl FileScheduleFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ScheduleFeed for FileScheduleFeed {
    async fn fetch(&self, query: &ScheduleQuery) -> Result<Vec<RawScheduleItem>, FeedError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let payload: serde_json::Value = serde_json::from_str(&content)?;
        let items = parse_schedule_payload(&payload)?;
        Ok(apply_query(items, query))
    }
}
