//! ローカルのサンプルデータ
//!
//! リモートのスケジュールが取得できない場合でも一覧を表示するための
//! 固定スケジュールと、一覧の各検査から作るサンプルレコード。

use crate::assemble::{
    ApplicationDetails, GeneralAnswers, InspectionDetails, PropertyDetails, SourceRecord,
};
use crate::types::{InspectionStatus, InspectionType};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// 一覧に表示する検査の概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSummary {
    pub id: String,
    pub inspection_type: InspectionType,
    pub address: String,
    pub status: InspectionStatus,
    pub time: String,
    /// リモートのフォーム名（あれば見出しに使う）
    #[serde(default)]
    pub title: Option<String>,
}

impl InspectionSummary {
    fn new(
        id: &str,
        inspection_type: InspectionType,
        address: &str,
        status: InspectionStatus,
        time: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            inspection_type,
            address: address.to_string(),
            status,
            time: time.to_string(),
            title: None,
        }
    }

    /// 見出し（フォーム名がなければ種別名）
    pub fn heading(&self) -> &str {
        self.title.as_deref().unwrap_or(self.inspection_type.name())
    }
}

/// 1日分のスケジュール
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub id: String,
    pub date: NaiveDate,
    pub inspections: Vec<InspectionSummary>,
}

/// 固定スケジュール（today から過去4日分）
pub fn fallback_schedule(today: NaiveDate) -> Vec<DaySchedule> {
    use InspectionStatus::{Cancelled, Completed, Pending};
    use InspectionType::*;

    let day = |offset: u64| today.checked_sub_days(Days::new(offset)).unwrap_or(today);

    vec![
        DaySchedule {
            id: "1".to_string(),
            date: day(0),
            inspections: vec![
                InspectionSummary::new("101", Residential, "123 Main St", Completed, "09:30 AM"),
                InspectionSummary::new("102", RentalProperty, "456 Oak Ave", Pending, "02:00 PM"),
            ],
        },
        DaySchedule {
            id: "2".to_string(),
            date: day(1),
            inspections: vec![InspectionSummary::new(
                "103",
                Commercial,
                "789 Business Park",
                Completed,
                "10:15 AM",
            )],
        },
        DaySchedule {
            id: "3".to_string(),
            date: day(2),
            inspections: vec![
                InspectionSummary::new("104", Insurance, "321 Pine Rd", Completed, "11:00 AM"),
                InspectionSummary::new("105", PrePurchase, "654 Maple Dr", Cancelled, "03:30 PM"),
                InspectionSummary::new("106", Maintenance, "987 Cedar Ln", Completed, "05:00 PM"),
            ],
        },
        DaySchedule {
            id: "4".to_string(),
            date: day(3),
            inspections: vec![
                InspectionSummary::new("107", Residential, "159 Elm St", Completed, "09:00 AM"),
                InspectionSummary::new("108", RentalProperty, "753 Birch Ave", Completed, "01:45 PM"),
            ],
        },
    ]
}

impl SourceRecord {
    /// 一覧の検査からサンプルレコードを作る
    ///
    /// 検査結果は完了済みの場合のみ含める。
    pub fn sample_for(summary: &InspectionSummary, date: NaiveDate) -> SourceRecord {
        let inspection_details = match summary.status {
            InspectionStatus::Completed => Some(InspectionDetails {
                general_questions: GeneralAnswers {
                    question1: "Yes".to_string(),
                    question2: "No".to_string(),
                    question3: "Yes".to_string(),
                    question4: "Sample answer for generic question 4".to_string(),
                },
                property_details: PropertyDetails {
                    property_type: "Residential".to_string(),
                    year_built: "2010".to_string(),
                    number_of_bedrooms: "3".to_string(),
                    number_of_bathrooms: "2".to_string(),
                    property_size: "250".to_string(),
                },
                inspection_notes: "All items inspected and passed".to_string(),
                recommendations: "Regular maintenance required".to_string(),
                photos: Vec::new(),
            }),
            InspectionStatus::Pending | InspectionStatus::Cancelled => None,
        };

        SourceRecord {
            application_details: ApplicationDetails {
                application_id: summary.id.clone(),
                property_address: summary.address.clone(),
                inspection_date: date.to_string(),
                inspection_time: summary.time.clone(),
                inspection_type: summary.inspection_type.name().to_string(),
                contact_name: "John Doe".to_string(),
                contact_phone: "0412 345 678".to_string(),
                contact_email: "john.doe@example.com".to_string(),
            },
            inspection_details,
        }
    }
}
