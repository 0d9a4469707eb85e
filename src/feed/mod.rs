//! スケジュールフィード
//!
//! リモートの InspectionSchedule を取得する外部コラボレータ。
//! 失敗や不正なレスポンスはダッシュボード側で「データなし」として扱う。

mod file;
mod http;

pub use file::FileScheduleFeed;
pub use http::HttpScheduleFeed;

use async_trait::async_trait;
use inspection_common::{RawScheduleItem, ScheduleQuery};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("{0}")]
    Malformed(#[from] inspection_common::Error),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait ScheduleFeed: Send + Sync {
    async fn fetch(&self, query: &ScheduleQuery) -> Result<Vec<RawScheduleItem>, FeedError>;
}

#[async_trait]
impl<T: ScheduleFeed + ?Sized> ScheduleFeed for Box<T> {
    async fn fetch(&self, query: &ScheduleQuery) -> Result<Vec<RawScheduleItem>, FeedError> {
        (**self).fetch(query).await
    }
}

/// 常に空を返すフィード（オフライン用）
pub struct OfflineFeed;

#[async_trait]
impl ScheduleFeed for OfflineFeed {
    async fn fetch(&self, _query: &ScheduleQuery) -> Result<Vec<RawScheduleItem>, FeedError> {
        Ok(Vec::new())
    }
}

/// クエリをフィード側の項目で絞り込む（ファイル/テスト用）
pub(crate) fn apply_query(items: Vec<RawScheduleItem>, query: &ScheduleQuery) -> Vec<RawScheduleItem> {
    match &query.id {
        Some(id) => items
            .into_iter()
            .filter(|item| item.id.as_deref() == Some(id.as_str()))
            .collect(),
        None => items,
    }
}
