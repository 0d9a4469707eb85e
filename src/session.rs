//! フォームセッション（状態機械）
//!
//! 1フォーム分の状態を所有し、提出パイプラインを駆動する。
//!
//! 状態遷移:
//! - Idle → Validating → (不正) Idle、全エラーをまとめて通知
//! - Validating → Uploading（画像あり） / Saving（画像なし）
//! - Uploading → Saving / Error
//! - Saving → Success（フォームを初期化、完了通知は一定時間で消える） / Error（入力は保持）
//!
//! Uploading・Saving 中は変更操作をすべて拒否する（セッション内のみのガード）。
//! 状態が変わるたびにスナップショットを watch チャネルへ送る。

use crate::picker::ImagePicker;
use crate::pipeline::{Draft, SubmissionPipeline};
use crate::store::{ImageStore, RecordStore};
use inspection_common::{
    assemble, validate_all, FieldKey, FieldValue, FormError, FormState, FormValues,
    InspectionRecord, Lifecycle, SourceRecord, ViewContext,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// 完了通知の表示時間
pub const SUCCESS_NOTICE_DELAY: Duration = Duration::from_millis(5000);

const UPLOADING_MESSAGE: &str = "Uploading image and saving data...";
const SAVING_MESSAGE: &str = "Saving inspection data...";

/// 表示層へ渡すスナップショット
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub state: Lifecycle,
    pub values: FormValues,
    pub errors: BTreeMap<FieldKey, String>,
    pub is_busy: bool,
    pub read_only: bool,
    pub has_staged_image: bool,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
    pub loading_message: Option<String>,
    pub(crate) notice_seq: u64,
}

struct Notice {
    seq: u64,
    message: String,
    expires_at: Instant,
}

struct Inner {
    form: FormState,
    notice: Option<Notice>,
    notice_seq: u64,
    error_message: Option<String>,
    loading_message: Option<String>,
}

impl Inner {
    fn expire_notice(&mut self) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.expires_at <= Instant::now())
        {
            self.notice = None;
        }
    }

    fn snapshot(&mut self) -> FormSnapshot {
        self.expire_notice();
        FormSnapshot {
            state: self.form.lifecycle,
            values: self.form.values.clone(),
            errors: self.form.errors.clone(),
            is_busy: self.form.is_busy(),
            read_only: self.form.read_only,
            has_staged_image: self.form.staged_image.is_some(),
            success_message: self.notice.as_ref().map(|n| n.message.clone()),
            error_message: self.error_message.clone(),
            loading_message: self.loading_message.clone(),
            notice_seq: self.notice.as_ref().map(|n| n.seq).unwrap_or_default(),
        }
    }
}

pub struct FormSession<I, R> {
    inner: Mutex<Inner>,
    pipeline: SubmissionPipeline<I, R>,
    ctx: ViewContext,
    notice_delay: Duration,
    snapshots: Arc<watch::Sender<FormSnapshot>>,
}

impl<I: ImageStore, R: RecordStore> FormSession<I, R> {
    pub fn new(pipeline: SubmissionPipeline<I, R>, ctx: ViewContext, initial: FormState) -> Self {
        let mut inner = Inner {
            form: initial,
            notice: None,
            notice_seq: 0,
            error_message: None,
            loading_message: None,
        };
        let (tx, _rx) = watch::channel(inner.snapshot());

        Self {
            inner: Mutex::new(inner),
            pipeline,
            ctx,
            notice_delay: SUCCESS_NOTICE_DELAY,
            snapshots: Arc::new(tx),
        }
    }

    /// リモート/サンプルレコードから組み立てて開く
    pub fn open(
        pipeline: SubmissionPipeline<I, R>,
        remote: Option<&SourceRecord>,
        fallback: &SourceRecord,
        ctx: ViewContext,
    ) -> Self {
        let initial = assemble(remote, fallback, &ctx);
        Self::new(pipeline, ctx, initial)
    }

    pub fn with_notice_delay(mut self, delay: Duration) -> Self {
        self.notice_delay = delay;
        self
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    pub fn pipeline(&self) -> &SubmissionPipeline<I, R> {
        &self.pipeline
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.lock().snapshot()
    }

    /// スナップショットの購読
    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.snapshots.subscribe()
    }

    /// 変更操作の前に確認すること
    pub fn is_busy(&self) -> bool {
        self.inner.lock().form.is_busy()
    }

    fn publish(&self, inner: &mut Inner) {
        let snapshot = inner.snapshot();
        tracing::debug!(state = snapshot.state.as_str(), errors = snapshot.errors.len(), "form snapshot");
        self.snapshots.send_replace(snapshot);
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut FormState) -> Result<T, FormError>,
    ) -> Result<T, FormError> {
        let mut inner = self.inner.lock();
        let result = op(&mut inner.form);
        if result.is_ok() {
            self.publish(&mut inner);
        }
        result
    }

    pub fn edit_field(&self, key: FieldKey, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let value = value.into();
        self.mutate(|form| form.edit_field(key, value))
    }

    pub fn remove_image(&self) -> Result<(), FormError> {
        self.mutate(FormState::remove_image)
    }

    /// 入力をクリア
    pub fn reset(&self) -> Result<(), FormError> {
        self.mutate(|form| {
            form.clear()?;
            form.lifecycle = Lifecycle::Idle;
            Ok(())
        })?;
        let mut inner = self.inner.lock();
        inner.error_message = None;
        self.publish(&mut inner);
        Ok(())
    }

    /// 画像を選択
    ///
    /// 選択前に以前の画像を外すので、キャンセル時に古い画像は残らない。
    /// 選択された場合は true。
    pub async fn pick_image<P: ImagePicker + ?Sized>(&self, picker: &P) -> Result<bool, FormError> {
        self.mutate(FormState::clear_staged_image)?;

        match picker.pick().await {
            Ok(Some(image)) => {
                tracing::info!(file = %image.file_name, "image staged");
                self.mutate(|form| form.stage_image(image))?;
                Ok(true)
            }
            Ok(None) => {
                tracing::debug!("image selection cancelled");
                Ok(false)
            }
            Err(e) => {
                let message = format!("Failed to select image: {}", e);
                let mut inner = self.inner.lock();
                inner.error_message = Some(message.clone());
                self.publish(&mut inner);
                Err(FormError::ImagePick(message))
            }
        }
    }

    /// 提出
    ///
    /// 処理中の二重提出は `FormError::Busy` で拒否し、パイプラインは呼ばない。
    pub async fn submit(&self) -> Result<InspectionRecord, FormError> {
        let (draft, image) = {
            let mut inner = self.inner.lock();
            if let Err(e) = inner.form.ensure_mutable() {
                tracing::warn!(error = %e, "submit rejected");
                return Err(e);
            }

            inner.form.lifecycle = Lifecycle::Validating;
            inner.notice = None;
            inner.error_message = None;
            self.publish(&mut inner);

            let report = validate_all(&inner.form.values);
            if !report.is_valid {
                let message = report.missing_fields_message().unwrap_or_default();
                tracing::info!(missing = report.errors.len(), "validation failed");
                inner.form.errors = report.errors.clone();
                inner.form.lifecycle = Lifecycle::Idle;
                inner.error_message = Some(message.clone());
                self.publish(&mut inner);
                return Err(FormError::Validation {
                    errors: report.errors,
                    message,
                });
            }

            inner.form.errors.clear();
            let image = inner.form.staged_image.take();
            let (lifecycle, loading) = match image {
                Some(_) => (Lifecycle::Uploading, UPLOADING_MESSAGE),
                None => (Lifecycle::Saving, SAVING_MESSAGE),
            };
            inner.form.lifecycle = lifecycle;
            inner.loading_message = Some(loading.to_string());
            self.publish(&mut inner);

            let draft = Draft {
                values: inner.form.values.clone(),
                inspection_type: self.ctx.inspection_type,
                inspection_name: self.ctx.inspection_name.clone(),
            };
            (draft, image)
        };

        let result = self
            .pipeline
            .submit_with(draft, image.as_ref(), |phase| {
                let mut inner = self.inner.lock();
                if inner.form.lifecycle != phase {
                    inner.form.lifecycle = phase;
                    self.publish(&mut inner);
                }
            })
            .await;

        let mut inner = self.inner.lock();
        inner.loading_message = None;
        match result {
            Ok(record) => {
                inner.form.reset_fields();
                inner.form.lifecycle = Lifecycle::Success;
                inner.notice_seq += 1;
                let seq = inner.notice_seq;
                inner.notice = Some(Notice {
                    seq,
                    message: format!(
                        "{} submitted successfully! You can submit another inspection if needed.",
                        self.ctx.inspection_name
                    ),
                    expires_at: Instant::now() + self.notice_delay,
                });
                self.publish(&mut inner);
                self.schedule_notice_clear(seq);
                Ok(record)
            }
            Err(e) => {
                // 再提出できるよう画像を戻す（入力値はそのまま）
                inner.form.staged_image = image;
                inner.form.lifecycle = Lifecycle::Error;
                inner.error_message = Some(e.to_string());
                self.publish(&mut inner);
                Err(FormError::Submission(e))
            }
        }
    }

    /// 通知を一定時間後に消す（ランタイム外では snapshot 時の期限切れ判定のみ）
    fn schedule_notice_clear(&self, seq: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let tx = Arc::clone(&self.snapshots);
        let delay = self.notice_delay;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_if_modified(|snapshot| {
                if snapshot.notice_seq == seq && snapshot.success_message.is_some() {
                    snapshot.success_message = None;
                    snapshot.notice_seq = 0;
                    true
                } else {
                    false
                }
            });
        });
    }
}
