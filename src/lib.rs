//! 検査フォームクライアント
//!
//! 共通ライブラリの純粋ロジックに、外部コラボレータ（スケジュールフィード、
//! 画像/レコードストア、画像選択）と提出パイプラインを組み合わせる。

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feed;
pub mod interactive;
pub mod picker;
pub mod pipeline;
pub mod session;
pub mod store;

pub use dashboard::{Dashboard, OpenedInspection};
pub use error::{InspectionError, Result};
pub use pipeline::{Draft, SubmissionPipeline};
pub use session::{FormSession, FormSnapshot, SUCCESS_NOTICE_DELAY};
