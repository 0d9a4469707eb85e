//! フォーム状態
//!
//! 1つのフォームセッションが排他的に所有する一時状態。
//! 状態遷移そのものはアプリ側のセッションが駆動し、ここでは
//! 値の保持と変更ガード（閲覧専用・処理中）だけを扱う。

use crate::error::Error;
use crate::field::{FieldKey, FieldValue, FormValues};
use crate::validate::required_message;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

/// フォームのライフサイクル
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    #[default]
    Idle,
    Validating,
    Uploading,
    Saving,
    Success,
    Error,
}

impl Lifecycle {
    /// アップロード中・保存中は変更操作を受け付けない
    pub fn is_busy(self) -> bool {
        matches!(self, Lifecycle::Uploading | Lifecycle::Saving)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Validating => "validating",
            Lifecycle::Uploading => "uploading",
            Lifecycle::Saving => "saving",
            Lifecycle::Success => "success",
            Lifecycle::Error => "error",
        }
    }
}

/// 選択済み・未アップロードの画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    pub path: PathBuf,
    pub file_name: String,
}

impl StagedImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 提出パイプラインのエラー（メッセージはそのまま表示する）
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Persist(String),
}

/// フォーム操作のエラー
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("A submission is already in progress")]
    Busy,

    #[error("This inspection is view-only")]
    ReadOnly,

    #[error("{message}")]
    Validation {
        errors: BTreeMap<FieldKey, String>,
        message: String,
    },

    #[error("{0}")]
    ImagePick(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Field(#[from] Error),
}

/// フォーム状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: FormValues,
    /// 項目 → エラーメッセージ（空なら有効）
    pub errors: BTreeMap<FieldKey, String>,
    pub staged_image: Option<StagedImage>,
    pub lifecycle: Lifecycle,
    pub read_only: bool,
}

impl FormState {
    pub fn with_values(values: FormValues, read_only: bool) -> Self {
        Self {
            values,
            read_only,
            ..Default::default()
        }
    }

    pub fn is_busy(&self) -> bool {
        self.lifecycle.is_busy()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// 変更可能か確認
    pub fn ensure_mutable(&self) -> Result<(), FormError> {
        if self.read_only {
            return Err(FormError::ReadOnly);
        }
        if self.is_busy() {
            return Err(FormError::Busy);
        }
        Ok(())
    }

    /// 項目を編集
    ///
    /// 既存のエラーは消し、必須項目が空になった場合は即座にエラーを付ける。
    pub fn edit_field(&mut self, key: FieldKey, value: FieldValue) -> Result<(), FormError> {
        self.ensure_mutable()?;
        let blank = value.is_blank();
        self.values.set(key, value)?;

        self.errors.remove(&key);
        if blank && key.is_required() {
            self.errors.insert(key, required_message(key));
        }
        Ok(())
    }

    /// 画像をセット（以前の画像は置き換え）
    pub fn stage_image(&mut self, image: StagedImage) -> Result<(), FormError> {
        self.ensure_mutable()?;
        self.staged_image = Some(image);
        Ok(())
    }

    /// 選択前に以前の画像を外す
    pub fn clear_staged_image(&mut self) -> Result<(), FormError> {
        self.ensure_mutable()?;
        self.staged_image = None;
        Ok(())
    }

    /// 画像と写真欄をクリア
    pub fn remove_image(&mut self) -> Result<(), FormError> {
        self.ensure_mutable()?;
        self.staged_image = None;
        self.values.picture_url.clear();
        self.values.picture_comment.clear();
        Ok(())
    }

    /// 入力をすべて既定値に戻す
    pub fn clear(&mut self) -> Result<(), FormError> {
        self.ensure_mutable()?;
        self.reset_fields();
        Ok(())
    }

    /// ガードなしで既定値に戻す（提出成功後に使用）
    pub fn reset_fields(&mut self) {
        self.values = FormValues::default();
        self.errors.clear();
        self.staged_image = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_states() {
        assert!(Lifecycle::Uploading.is_busy());
        assert!(Lifecycle::Saving.is_busy());
        assert!(!Lifecycle::Idle.is_busy());
        assert!(!Lifecycle::Validating.is_busy());
        assert!(!Lifecycle::Success.is_busy());
        assert!(!Lifecycle::Error.is_busy());
    }

    #[test]
    fn test_edit_field_sets_and_clears_error() {
        let mut state = FormState::default();

        state.edit_field(FieldKey::FirstName, "".into()).unwrap();
        assert_eq!(
            state.errors.get(&FieldKey::FirstName).map(String::as_str),
            Some("FirstName is required")
        );

        state.edit_field(FieldKey::FirstName, "Jane".into()).unwrap();
        assert!(state.errors.is_empty());
        assert_eq!(state.values.first_name, "Jane");
    }

    #[test]
    fn test_edit_optional_field_blank_no_error() {
        let mut state = FormState::default();
        state.edit_field(FieldKey::Contact, "  ".into()).unwrap();
        assert!(state.is_valid());
    }

    #[test]
    fn test_edit_rejected_when_read_only() {
        let mut state = FormState::with_values(FormValues::default(), true);
        assert_eq!(state.edit_field(FieldKey::Phone, "1".into()), Err(FormError::ReadOnly));
        assert_eq!(state.clear(), Err(FormError::ReadOnly));
        assert_eq!(state.remove_image(), Err(FormError::ReadOnly));
        assert!(state.values.phone.is_empty());
    }

    #[test]
    fn test_edit_rejected_when_busy() {
        let mut state = FormState {
            lifecycle: Lifecycle::Saving,
            ..Default::default()
        };
        assert_eq!(state.edit_field(FieldKey::Phone, "1".into()), Err(FormError::Busy));
        assert_eq!(
            state.stage_image(StagedImage::new("/tmp/a.jpg")),
            Err(FormError::Busy)
        );
        assert!(state.staged_image.is_none());
    }

    #[test]
    fn test_remove_image_clears_picture_fields() {
        let mut state = FormState::default();
        state.values.picture_url = "file:///x.jpg".to_string();
        state.values.picture_comment = "front door".to_string();
        state.stage_image(StagedImage::new("/tmp/a.jpg")).unwrap();

        state.remove_image().unwrap();
        assert!(state.staged_image.is_none());
        assert!(state.values.picture_url.is_empty());
        assert!(state.values.picture_comment.is_empty());
    }

    #[test]
    fn test_staged_image_file_name() {
        let image = StagedImage::new("/photos/front.jpg");
        assert_eq!(image.file_name, "front.jpg");
    }

    #[test]
    fn test_submission_error_is_verbatim() {
        let err = FormError::from(SubmissionError::Upload("connection reset".to_string()));
        assert_eq!(err.to_string(), "connection reset");
    }
}
