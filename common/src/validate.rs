//! 入力検証
//!
//! 必須項目（applicationId, firstName, lastName, phone, location）は
//! 前後の空白を除いて空でないこと。その他の項目は任意。

use crate::field::{FieldKey, FormValues};
use std::collections::BTreeMap;

/// 単一項目の検証結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub ok: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    fn pass() -> Self {
        Self { ok: true, message: None }
    }

    fn fail(message: String) -> Self {
        Self { ok: false, message: Some(message) }
    }
}

/// フォーム全体の検証結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<FieldKey, String>,
}

impl ValidationReport {
    /// 未入力項目をまとめたユーザー向けメッセージ
    pub fn missing_fields_message(&self) -> Option<String> {
        missing_fields_message(&self.errors)
    }
}

/// 必須メッセージ: "<Label> is required"
pub fn required_message(key: FieldKey) -> String {
    format!("{} is required", key.label())
}

/// 単一項目を検証
pub fn validate(key: FieldKey, raw_value: &str) -> ValidationResult {
    if key.is_required() && raw_value.trim().is_empty() {
        ValidationResult::fail(required_message(key))
    } else {
        ValidationResult::pass()
    }
}

/// 全必須項目を検証（途中で打ち切らない）
pub fn validate_all(values: &FormValues) -> ValidationReport {
    let errors: BTreeMap<FieldKey, String> = FieldKey::REQUIRED
        .into_iter()
        .filter_map(|key| {
            let raw = values.text(key).unwrap_or_default();
            validate(key, raw).message.map(|message| (key, message))
        })
        .collect();

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// エラー項目のラベルを列挙したメッセージ（エラーなしは None）
pub fn missing_fields_message(errors: &BTreeMap<FieldKey, String>) -> Option<String> {
    if errors.is_empty() {
        return None;
    }

    let labels = errors
        .keys()
        .map(|k| k.label())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("Please fill in the following required fields: {}", labels))
}
