//! フォーム項目の定義
//!
//! - FieldKey: 項目キー（camelCase名で入出力）
//! - FieldValue: 編集値（テキスト or 真偽値）
//! - FormValues: フォームの現在値

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// フォーム項目キー
///
/// 宣言順は画面上の並び順（検証メッセージの列挙順にも使う）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    ApplicationId,
    FirstName,
    LastName,
    Contact,
    Phone,
    Location,
    IsWashbasin,
    IsRefrigerator,
    IsGarage,
    PictureUrl,
    PictureComment,
    GenericQuestion4,
}

impl FieldKey {
    pub const ALL: [FieldKey; 12] = [
        FieldKey::ApplicationId,
        FieldKey::FirstName,
        FieldKey::LastName,
        FieldKey::Contact,
        FieldKey::Phone,
        FieldKey::Location,
        FieldKey::IsWashbasin,
        FieldKey::IsRefrigerator,
        FieldKey::IsGarage,
        FieldKey::PictureUrl,
        FieldKey::PictureComment,
        FieldKey::GenericQuestion4,
    ];

    /// 必須項目
    pub const REQUIRED: [FieldKey; 5] = [
        FieldKey::ApplicationId,
        FieldKey::FirstName,
        FieldKey::LastName,
        FieldKey::Phone,
        FieldKey::Location,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::ApplicationId => "applicationId",
            FieldKey::FirstName => "firstName",
            FieldKey::LastName => "lastName",
            FieldKey::Contact => "contact",
            FieldKey::Phone => "phone",
            FieldKey::Location => "location",
            FieldKey::IsWashbasin => "isWashbasin",
            FieldKey::IsRefrigerator => "isRefrigerator",
            FieldKey::IsGarage => "isGarage",
            FieldKey::PictureUrl => "pictureUrl",
            FieldKey::PictureComment => "pictureComment",
            FieldKey::GenericQuestion4 => "genericQuestion4",
        }
    }

    /// 表示ラベル（キーの先頭を大文字化: firstName → FirstName）
    pub fn label(self) -> String {
        let key = self.as_str();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// 真偽値項目か
    pub fn is_flag(self) -> bool {
        matches!(
            self,
            FieldKey::IsWashbasin | FieldKey::IsRefrigerator | FieldKey::IsGarage
        )
    }
}

impl std::str::FromStr for FieldKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 編集値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// 空白のみのテキストは空として扱う
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Flag(_) => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Flag(flag)
    }
}

/// フォームの現在値
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormValues {
    pub application_id: String,
    pub first_name: String,
    pub last_name: String,
    pub contact: String,          // メールアドレス
    pub phone: String,
    pub location: String,         // 物件住所
    pub is_washbasin: bool,
    pub is_refrigerator: bool,
    pub is_garage: bool,
    pub picture_url: String,
    pub picture_comment: String,
    pub generic_question4: String,
}

impl FormValues {
    /// テキスト項目の値（真偽値項目は None）
    pub fn text(&self, key: FieldKey) -> Option<&str> {
        let value = match key {
            FieldKey::ApplicationId => &self.application_id,
            FieldKey::FirstName => &self.first_name,
            FieldKey::LastName => &self.last_name,
            FieldKey::Contact => &self.contact,
            FieldKey::Phone => &self.phone,
            FieldKey::Location => &self.location,
            FieldKey::PictureUrl => &self.picture_url,
            FieldKey::PictureComment => &self.picture_comment,
            FieldKey::GenericQuestion4 => &self.generic_question4,
            FieldKey::IsWashbasin | FieldKey::IsRefrigerator | FieldKey::IsGarage => return None,
        };
        Some(value.as_str())
    }

    /// 真偽値項目の値（テキスト項目は None）
    pub fn flag(&self, key: FieldKey) -> Option<bool> {
        match key {
            FieldKey::IsWashbasin => Some(self.is_washbasin),
            FieldKey::IsRefrigerator => Some(self.is_refrigerator),
            FieldKey::IsGarage => Some(self.is_garage),
            _ => None,
        }
    }

    /// 値を設定（型が合わない場合はエラー）
    pub fn set(&mut self, key: FieldKey, value: FieldValue) -> Result<()> {
        match (key.is_flag(), value) {
            (true, FieldValue::Flag(flag)) => {
                match key {
                    FieldKey::IsWashbasin => self.is_washbasin = flag,
                    FieldKey::IsRefrigerator => self.is_refrigerator = flag,
                    _ => self.is_garage = flag,
                }
                Ok(())
            }
            (false, FieldValue::Text(text)) => {
                let slot = match key {
                    FieldKey::ApplicationId => &mut self.application_id,
                    FieldKey::FirstName => &mut self.first_name,
                    FieldKey::LastName => &mut self.last_name,
                    FieldKey::Contact => &mut self.contact,
                    FieldKey::Phone => &mut self.phone,
                    FieldKey::Location => &mut self.location,
                    FieldKey::PictureUrl => &mut self.picture_url,
                    FieldKey::PictureComment => &mut self.picture_comment,
                    _ => &mut self.generic_question4,
                };
                *slot = text;
                Ok(())
            }
            (is_flag, _) => Err(Error::FieldType {
                field: key.as_str().to_string(),
                expected: if is_flag { "boolean" } else { "text" },
            }),
        }
    }

    /// 全項目が既定値か
    pub fn is_blank(&self) -> bool {
        *self == FormValues::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_capitalizes_key() {
        assert_eq!(FieldKey::FirstName.label(), "FirstName");
        assert_eq!(FieldKey::ApplicationId.label(), "ApplicationId");
        assert_eq!(FieldKey::Phone.label(), "Phone");
    }

    #[test]
    fn test_parse_field_key() {
        assert_eq!("lastName".parse::<FieldKey>().unwrap(), FieldKey::LastName);
        assert_eq!("genericQuestion4".parse::<FieldKey>().unwrap(), FieldKey::GenericQuestion4);
        assert!(matches!("LastName".parse::<FieldKey>(), Err(Error::UnknownField(_))));
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<_> = FieldKey::ALL.into_iter().filter(|k| k.is_required()).collect();
        assert_eq!(required, FieldKey::REQUIRED.to_vec());
        assert!(!FieldKey::Contact.is_required());
    }

    #[test]
    fn test_set_text_and_flag() {
        let mut values = FormValues::default();
        values.set(FieldKey::Phone, "0412".into()).unwrap();
        values.set(FieldKey::IsGarage, true.into()).unwrap();

        assert_eq!(values.text(FieldKey::Phone), Some("0412"));
        assert_eq!(values.flag(FieldKey::IsGarage), Some(true));
        assert_eq!(values.text(FieldKey::IsGarage), None);
        assert_eq!(values.flag(FieldKey::Phone), None);
    }

    #[test]
    fn test_set_type_mismatch() {
        let mut values = FormValues::default();
        let err = values.set(FieldKey::IsWashbasin, "yes".into()).unwrap_err();
        assert!(matches!(err, Error::FieldType { expected: "boolean", .. }));

        let err = values.set(FieldKey::FirstName, true.into()).unwrap_err();
        assert!(matches!(err, Error::FieldType { expected: "text", .. }));
        assert!(values.is_blank());
    }

    #[test]
    fn test_blank_value() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(!FieldValue::from(" a ").is_blank());
        assert!(!FieldValue::from(false).is_blank());
    }
}
