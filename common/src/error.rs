//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown inspection type: {0}")]
    UnknownInspectionType(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Field {field} expects a {expected} value")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    #[error("Malformed schedule data: {0}")]
    MalformedSchedule(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
