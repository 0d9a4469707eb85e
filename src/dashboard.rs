//! ダッシュボード
//!
//! 固定スケジュールを常に持ち、リモートの一覧が取れたときだけ索引を作り直す。
//! 取得に失敗した場合は直前の索引をそのまま使う。

use crate::feed::{FeedError, ScheduleFeed};
use chrono::NaiveDate;
use inspection_common::{
    fallback_schedule, DashboardIndex, DaySchedule, InspectionSummary, RawScheduleItem, ScheduleQuery, SourceRecord, ViewContext,
};

/// 詳細を開くのに必要な材料
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedInspection {
    pub summary: InspectionSummary,
    pub ctx: ViewContext,
    pub remote: Option<SourceRecord>,
    /// フィード上の元データ（表示用）
    pub remote_item: Option<RawScheduleItem>,
    pub fallback: SourceRecord,
}

pub struct Dashboard<F> {
    feed: F,
    fallback: Vec<DaySchedule>,
    index: DashboardIndex,
    remote: Vec<RawScheduleItem>,
    last_error: Option<String>,
}

impl<F: ScheduleFeed> Dashboard<F> {
    pub fn new(feed: F, today: NaiveDate) -> Self {
        let fallback = fallback_schedule(today);
        let index = DashboardIndex::build(&[], &fallback);
        Self {
            feed,
            fallback,
            index,
            remote: Vec::new(),
            last_error: None,
        }
    }

    pub fn index(&self) -> &DashboardIndex {
        &self.index
    }

    /// 直前の取得エラー
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// リモート一覧を取り直して索引を再構築
    ///
    /// 失敗時は索引を変えずにエラーを返す（呼び出し側は無視してよい）。
    pub async fn refresh(&mut self) -> Result<&DashboardIndex, FeedError> {
        match self.feed.fetch(&ScheduleQuery::all()).await {
            Ok(items) => {
                tracing::info!(items = items.len(), "schedule refreshed");
                self.index = DashboardIndex::build(&items, &self.fallback);
                self.remote = items;
                self.last_error = None;
                Ok(&self.index)
            }
            Err(e) => {
                tracing::warn!(error = %e, "schedule fetch failed; keeping previous index");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// 1件の詳細をフィードから取得
    pub async fn detail(&self, id: &str) -> Result<Option<RawScheduleItem>, FeedError> {
        let items = self.feed.fetch(&ScheduleQuery::detail(id)).await?;
        Ok(items.into_iter().find(|item| item.id.as_deref() == Some(id)))
    }

    /// 既存の検査を開く
    ///
    /// リモートレコードは取得済みの一覧からIDで探し、なければ詳細を問い合わせる。
    /// 詳細の取得失敗はサンプルのみで開く。
    pub async fn open(&self, id: &str) -> Option<OpenedInspection> {
        let (day, summary) = self.index.find(id)?;
        let summary = summary.clone();
        let fallback = SourceRecord::sample_for(&summary, day.date);

        let remote_item = match self.remote.iter().find(|item| item.id.as_deref() == Some(id)) {
            Some(item) => Some(item.clone()),
            None => match self.detail(id).await {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!(id, error = %e, "detail fetch failed; using sample record");
                    None
                }
            },
        };
        let remote = remote_item.as_ref().map(SourceRecord::from);

        let ctx = ViewContext::existing(summary.inspection_type, summary.status);
        Some(OpenedInspection {
            summary,
            ctx,
            remote,
            remote_item,
            fallback,
        })
    }
}
