//! レコード組み立て
//!
//! リモートのスケジュールレコード（あれば）とローカルのサンプルデータを
//! 突き合わせ、ステータスに応じた初期フォーム状態を作る。
//!
//! - Completed: 全項目（一般質問・写真含む）を反映、閲覧専用
//! - Pending: 連絡先のみ反映、一般質問は既定値で編集可
//! - ステータスなし（新規）: すべて空
//!
//! 氏名の分割は最初の空白で姓名に分ける。複数語の姓は失われる（既知の制限）。

use crate::field::FormValues;
use crate::form::FormState;
use crate::types::{InspectionRecord, InspectionStatus, InspectionType};
use serde::{Deserialize, Serialize};

/// 申請情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationDetails {
    pub application_id: String,
    pub property_address: String,
    pub inspection_date: String,
    pub inspection_time: String,
    pub inspection_type: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
}

/// 一般質問の回答（"Yes"/"No" 文字列）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralAnswers {
    pub question1: String,
    pub question2: String,
    pub question3: String,
    pub question4: String,
}

/// 物件情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyDetails {
    pub property_type: String,
    pub year_built: String,
    pub number_of_bedrooms: String,
    pub number_of_bathrooms: String,
    pub property_size: String,
}

/// 検査結果（完了済みのみ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectionDetails {
    pub general_questions: GeneralAnswers,
    pub property_details: PropertyDetails,
    pub inspection_notes: String,
    pub recommendations: String,
    pub photos: Vec<String>,
}

/// 組み立て元のレコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceRecord {
    pub application_details: ApplicationDetails,
    pub inspection_details: Option<InspectionDetails>,
}

impl SourceRecord {
    /// self を優先し、空の項目だけ fallback で補う
    pub fn merged_over(&self, fallback: &SourceRecord) -> SourceRecord {
        let ours = &self.application_details;
        let theirs = &fallback.application_details;
        let pick = |a: &String, b: &String| if a.trim().is_empty() { b.clone() } else { a.clone() };

        SourceRecord {
            application_details: ApplicationDetails {
                application_id: pick(&ours.application_id, &theirs.application_id),
                property_address: pick(&ours.property_address, &theirs.property_address),
                inspection_date: pick(&ours.inspection_date, &theirs.inspection_date),
                inspection_time: pick(&ours.inspection_time, &theirs.inspection_time),
                inspection_type: pick(&ours.inspection_type, &theirs.inspection_type),
                contact_name: pick(&ours.contact_name, &theirs.contact_name),
                contact_phone: pick(&ours.contact_phone, &theirs.contact_phone),
                contact_email: pick(&ours.contact_email, &theirs.contact_email),
            },
            inspection_details: self
                .inspection_details
                .clone()
                .or_else(|| fallback.inspection_details.clone()),
        }
    }
}

impl From<&InspectionRecord> for SourceRecord {
    fn from(record: &InspectionRecord) -> Self {
        let contact = &record.contact;
        let contact_name = format!("{} {}", contact.first_name, contact.last_name)
            .trim()
            .to_string();
        let yes_no = |b: bool| if b { "Yes" } else { "No" }.to_string();

        SourceRecord {
            application_details: ApplicationDetails {
                application_id: record.application_id.clone(),
                property_address: contact.property_address.clone(),
                inspection_date: record.created_at.date_naive().to_string(),
                inspection_time: String::new(),
                inspection_type: record.inspection_name.clone(),
                contact_name,
                contact_phone: contact.phone.clone(),
                contact_email: contact.email.clone(),
            },
            inspection_details: Some(InspectionDetails {
                general_questions: GeneralAnswers {
                    question1: yes_no(record.general.washbasin),
                    question2: yes_no(record.general.refrigerator),
                    question3: yes_no(record.general.garage),
                    question4: record.general.notes.clone(),
                },
                inspection_notes: record
                    .photo
                    .as_ref()
                    .map(|p| p.caption.clone())
                    .unwrap_or_default(),
                photos: record.photo.iter().map(|p| p.url.clone()).collect(),
                ..Default::default()
            }),
        }
    }
}

/// 画面遷移時に渡される表示コンテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
    /// None は新規検査
    pub status: Option<InspectionStatus>,
    pub is_viewing: bool,
    pub inspection_type: InspectionType,
    pub inspection_name: String,
}

impl ViewContext {
    /// 新規検査
    pub fn new_inspection(inspection_type: InspectionType) -> Self {
        Self {
            status: None,
            is_viewing: false,
            inspection_type,
            inspection_name: inspection_type.name().to_string(),
        }
    }

    /// 既存検査を開く（完了済みは閲覧モード）
    pub fn existing(inspection_type: InspectionType, status: InspectionStatus) -> Self {
        Self {
            status: Some(status),
            is_viewing: status == InspectionStatus::Completed,
            inspection_type,
            inspection_name: inspection_type.name().to_string(),
        }
    }
}

/// 連絡先氏名を空白の並びで分割
///
/// 空白がなければ姓は空。3語以上の場合は2語目のみ姓になる。
/// 先頭・末尾の空白や連続した空白は区切り1つとして扱うので、
/// `"  Mary  Ann"` も `("Mary", "Ann")` になる（1文字の空白で区切った場合とは結果が異なる）。
pub fn split_contact_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.next().unwrap_or_default().to_string();
    (first, last)
}

fn is_yes(answer: &str) -> bool {
    answer == "Yes"
}

/// 初期フォーム状態を組み立て
pub fn assemble(
    remote: Option<&SourceRecord>,
    fallback: &SourceRecord,
    ctx: &ViewContext,
) -> FormState {
    let Some(status) = ctx.status else {
        return FormState::default();
    };

    let source = match remote {
        Some(remote) => remote.merged_over(fallback),
        None => fallback.clone(),
    };

    let mut values = contact_values(&source.application_details);
    let read_only = match status {
        InspectionStatus::Completed => {
            if let Some(details) = &source.inspection_details {
                apply_inspection_details(&mut values, details);
            }
            true
        }
        InspectionStatus::Pending => ctx.is_viewing,
        InspectionStatus::Cancelled => true,
    };

    FormState::with_values(values, read_only)
}

fn contact_values(details: &ApplicationDetails) -> FormValues {
    let (first_name, last_name) = split_contact_name(&details.contact_name);
    FormValues {
        application_id: details.application_id.clone(),
        first_name,
        last_name,
        contact: details.contact_email.clone(),
        phone: details.contact_phone.clone(),
        location: details.property_address.clone(),
        ..Default::default()
    }
}

fn apply_inspection_details(values: &mut FormValues, details: &InspectionDetails) {
    let answers = &details.general_questions;
    values.is_washbasin = is_yes(&answers.question1);
    values.is_refrigerator = is_yes(&answers.question2);
    values.is_garage = is_yes(&answers.question3);
    values.generic_question4 = answers.question4.clone();
    values.picture_url = details.photos.first().cloned().unwrap_or_default();
    values.picture_comment = details.inspection_notes.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKey;
    use crate::form::FormError;

    fn completed_source() -> SourceRecord {
        SourceRecord {
            application_details: ApplicationDetails {
                application_id: "101".to_string(),
                property_address: "123 Main St".to_string(),
                contact_name: "John Doe".to_string(),
                contact_phone: "0412 345 678".to_string(),
                contact_email: "john.doe@example.com".to_string(),
                ..Default::default()
            },
            inspection_details: Some(InspectionDetails {
                general_questions: GeneralAnswers {
                    question1: "Yes".to_string(),
                    question2: "No".to_string(),
                    question3: "Yes".to_string(),
                    question4: "Sample answer".to_string(),
                },
                inspection_notes: "All items inspected and passed".to_string(),
                photos: vec!["https://example.com/1.jpg".to_string()],
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_split_contact_name() {
        assert_eq!(split_contact_name("John Doe"), ("John".into(), "Doe".into()));
        assert_eq!(split_contact_name("Cher"), ("Cher".into(), "".into()));
        assert_eq!(split_contact_name(""), ("".into(), "".into()));
        // 複数語の姓は2語目のみ残る
        assert_eq!(
            split_contact_name("Ludwig van Beethoven"),
            ("Ludwig".into(), "van".into())
        );
        // 連続・前後の空白やタブは区切り1つ
        assert_eq!(split_contact_name("  Mary  Ann "), ("Mary".into(), "Ann".into()));
        assert_eq!(split_contact_name("Mary\tAnn"), ("Mary".into(), "Ann".into()));
    }

    #[test]
    fn test_assemble_completed_populates_everything() {
        let ctx = ViewContext::existing(InspectionType::Residential, InspectionStatus::Completed);
        let mut state = assemble(None, &completed_source(), &ctx);

        assert!(state.read_only);
        assert_eq!(state.values.application_id, "101");
        assert_eq!(state.values.first_name, "John");
        assert_eq!(state.values.last_name, "Doe");
        assert!(state.values.is_washbasin);
        assert!(!state.values.is_refrigerator);
        assert!(state.values.is_garage);
        assert_eq!(state.values.generic_question4, "Sample answer");
        assert_eq!(state.values.picture_url, "https://example.com/1.jpg");
        assert_eq!(state.values.picture_comment, "All items inspected and passed");

        let before = state.values.clone();
        assert_eq!(
            state.edit_field(FieldKey::IsGarage, false.into()),
            Err(FormError::ReadOnly)
        );
        assert_eq!(state.values, before);
    }

    #[test]
    fn test_assemble_pending_ignores_general_questions() {
        let ctx = ViewContext::existing(InspectionType::RentalProperty, InspectionStatus::Pending);
        let mut state = assemble(None, &completed_source(), &ctx);

        assert!(!state.read_only);
        assert_eq!(state.values.phone, "0412 345 678");
        assert_eq!(state.values.location, "123 Main St");
        assert!(!state.values.is_washbasin);
        assert!(!state.values.is_garage);
        assert!(state.values.generic_question4.is_empty());
        assert!(state.values.picture_url.is_empty());

        state.edit_field(FieldKey::IsGarage, true.into()).unwrap();
        assert!(state.values.is_garage);
    }

    #[test]
    fn test_assemble_new_inspection_is_empty() {
        let ctx = ViewContext::new_inspection(InspectionType::Commercial);
        let state = assemble(Some(&completed_source()), &completed_source(), &ctx);

        assert!(state.values.is_blank());
        assert!(!state.read_only);
    }

    #[test]
    fn test_assemble_cancelled_is_view_only_contact() {
        let ctx = ViewContext::existing(InspectionType::PrePurchase, InspectionStatus::Cancelled);
        let state = assemble(None, &completed_source(), &ctx);

        assert!(state.read_only);
        assert_eq!(state.values.first_name, "John");
        assert!(!state.values.is_washbasin);
    }

    #[test]
    fn test_remote_takes_precedence_over_sample() {
        let remote = SourceRecord {
            application_details: ApplicationDetails {
                application_id: "307".to_string(),
                contact_name: "Ana Lima".to_string(),
                ..Default::default()
            },
            inspection_details: None,
        };
        let ctx = ViewContext::existing(InspectionType::Residential, InspectionStatus::Completed);
        let state = assemble(Some(&remote), &completed_source(), &ctx);

        assert_eq!(state.values.application_id, "307");
        assert_eq!(state.values.first_name, "Ana");
        // 空の項目はサンプルから補完
        assert_eq!(state.values.location, "123 Main St");
        assert!(state.values.is_washbasin);
    }

    #[test]
    fn test_completed_without_details_uses_defaults() {
        let mut source = completed_source();
        source.inspection_details = None;
        let ctx = ViewContext::existing(InspectionType::Residential, InspectionStatus::Completed);
        let state = assemble(None, &source, &ctx);

        assert!(state.read_only);
        assert!(!state.values.is_washbasin);
        assert_eq!(state.values.first_name, "John");
    }

    #[test]
    fn test_view_context_flags() {
        let ctx = ViewContext::existing(InspectionType::Insurance, InspectionStatus::Completed);
        assert!(ctx.is_viewing);
        assert_eq!(ctx.inspection_name, "Insurance Inspection");

        let ctx = ViewContext::existing(InspectionType::Insurance, InspectionStatus::Pending);
        assert!(!ctx.is_viewing);
    }
}
