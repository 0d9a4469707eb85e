//! Inspection Form Common Library
//!
//! CLIと将来のUI層で共有される型と純粋ロジック
//! （入力検証・レコード組み立て・ダッシュボード索引）

pub mod types;
pub mod field;
pub mod error;
pub mod validate;
pub mod form;
pub mod assemble;
pub mod sample;
pub mod schedule;

pub use types::{
    ContactDetails, GeneralQuestions, InspectionRecord, InspectionStatus, InspectionType, Photo,
};
pub use field::{FieldKey, FieldValue, FormValues};
pub use error::{Error, Result};
pub use validate::{validate, validate_all, ValidationReport, ValidationResult};
pub use form::{FormError, FormState, Lifecycle, StagedImage, SubmissionError};
pub use assemble::{assemble, split_contact_name, SourceRecord, ViewContext};
pub use sample::{fallback_schedule, DaySchedule, InspectionSummary};
pub use schedule::{parse_schedule_payload, DashboardIndex, DayEntry, RawScheduleItem, ScheduleQuery};
