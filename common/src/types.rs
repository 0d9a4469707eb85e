//! 検査レコードの型定義
//!
//! CLIと将来のUI層で共有される型:
//! - InspectionType: 検査種別（1..6）
//! - InspectionStatus: 検査ステータス
//! - InspectionRecord: 提出済みの検査レコード

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 検査種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InspectionType {
    Residential = 1,
    Commercial = 2,
    RentalProperty = 3,
    PrePurchase = 4,
    Insurance = 5,
    Maintenance = 6,
}

impl InspectionType {
    pub const ALL: [InspectionType; 6] = [
        InspectionType::Residential,
        InspectionType::Commercial,
        InspectionType::RentalProperty,
        InspectionType::PrePurchase,
        InspectionType::Insurance,
        InspectionType::Maintenance,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// 画面表示用の名称
    pub fn name(self) -> &'static str {
        match self {
            InspectionType::Residential => "Residential Inspection",
            InspectionType::Commercial => "Commercial Inspection",
            InspectionType::RentalProperty => "Rental Property Inspection",
            InspectionType::PrePurchase => "Pre-Purchase Inspection",
            InspectionType::Insurance => "Insurance Inspection",
            InspectionType::Maintenance => "Maintenance Inspection",
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| Error::UnknownInspectionType(id.to_string()))
    }
}

impl TryFrom<u8> for InspectionType {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        Self::from_id(id)
    }
}

impl From<InspectionType> for u8 {
    fn from(t: InspectionType) -> u8 {
        t.id()
    }
}

impl std::str::FromStr for InspectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u8 = s
            .trim()
            .parse()
            .map_err(|_| Error::UnknownInspectionType(s.to_string()))?;
        Self::from_id(id)
    }
}

impl std::fmt::Display for InspectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 検査ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InspectionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pending => "Pending",
            InspectionStatus::Completed => "Completed",
            InspectionStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::str::FromStr for InspectionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(InspectionStatus::Pending),
            "completed" => Ok(InspectionStatus::Completed),
            "cancelled" | "canceled" => Ok(InspectionStatus::Cancelled),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 連絡先
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub property_address: String,
}

/// 一般質問（洗面台・冷蔵庫・ガレージ + 自由記述）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralQuestions {
    pub washbasin: bool,
    pub refrigerator: bool,
    pub garage: bool,
    pub notes: String,            // 質問4
}

/// 写真参照（アップロード済みURL + キャプション）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Photo {
    pub url: String,
    pub caption: String,
}

/// 検査レコード
///
/// `status == Completed` のレコードは閲覧専用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    pub application_id: String,

    #[serde(default)]
    pub contact: ContactDetails,

    #[serde(default)]
    pub general: GeneralQuestions,

    #[serde(default)]
    pub photo: Option<Photo>,

    pub inspection_type: InspectionType,

    #[serde(default)]
    pub inspection_name: String,

    pub status: InspectionStatus,

    pub created_at: DateTime<Utc>,
}

impl InspectionRecord {
    /// 閲覧専用か（完了済み・キャンセル済み）
    pub fn is_view_only(&self) -> bool {
        match self.status {
            InspectionStatus::Pending => false,
            InspectionStatus::Completed | InspectionStatus::Cancelled => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspection_type_ids() {
        assert_eq!(InspectionType::Residential.id(), 1);
        assert_eq!(InspectionType::Maintenance.id(), 6);
        assert_eq!(InspectionType::from_id(3).unwrap(), InspectionType::RentalProperty);
        assert!(InspectionType::from_id(0).is_err());
        assert!(InspectionType::from_id(7).is_err());
    }

    #[test]
    fn test_inspection_type_parse() {
        assert_eq!("4".parse::<InspectionType>().unwrap(), InspectionType::PrePurchase);
        assert!("abc".parse::<InspectionType>().is_err());
        assert_eq!(InspectionType::Insurance.to_string(), "Insurance Inspection");
    }

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("completed".parse::<InspectionStatus>().unwrap(), InspectionStatus::Completed);
        assert_eq!("Pending".parse::<InspectionStatus>().unwrap(), InspectionStatus::Pending);
        assert_eq!(" CANCELLED ".parse::<InspectionStatus>().unwrap(), InspectionStatus::Cancelled);
        assert!(matches!(
            "Archived".parse::<InspectionStatus>(),
            Err(Error::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_record_serialize() {
        let record = InspectionRecord {
            application_id: "A1".to_string(),
            contact: ContactDetails {
                first_name: "John".to_string(),
                ..Default::default()
            },
            general: GeneralQuestions {
                garage: true,
                ..Default::default()
            },
            photo: None,
            inspection_type: InspectionType::Commercial,
            inspection_name: "Commercial Inspection".to_string(),
            status: InspectionStatus::Completed,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).expect("シリアライズ失敗");
        assert!(json.contains("\"applicationId\":\"A1\""));
        assert!(json.contains("\"inspectionType\":2"));
        assert!(json.contains("\"status\":\"Completed\""));
        assert!(json.contains("\"garage\":true"));

        let back: InspectionRecord = serde_json::from_str(&json).expect("デシリアライズ失敗");
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_rejects_unknown_type() {
        let json = r#"{
            "applicationId": "A1",
            "inspectionType": 9,
            "status": "Pending",
            "createdAt": "2026-01-18T00:00:00Z"
        }"#;
        assert!(serde_json::from_str::<InspectionRecord>(json).is_err());
    }

    #[test]
    fn test_view_only() {
        let mut record = InspectionRecord {
            application_id: "A1".to_string(),
            contact: ContactDetails::default(),
            general: GeneralQuestions::default(),
            photo: None,
            inspection_type: InspectionType::Residential,
            inspection_name: String::new(),
            status: InspectionStatus::Pending,
            created_at: Utc::now(),
        };
        assert!(!record.is_view_only());
        record.status = InspectionStatus::Completed;
        assert!(record.is_view_only());
    }
}
