//! スケジュールフィードの解析とダッシュボード索引
//!
//! リモートの InspectionSchedule レスポンスは
//! `{ "items": [...] }` か単一オブジェクトのどちらかで返る。

use crate::assemble::{ApplicationDetails, SourceRecord};
use crate::error::{Error, Result};
use crate::sample::{DaySchedule, InspectionSummary};
use crate::types::InspectionType;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// フィードの1件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScheduleItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub creation_date: Option<String>,
    #[serde(rename = "formID", deserialize_with = "string_or_number")]
    pub form_id: Option<String>,
    pub form_name: Option<String>,
    pub inspector_name: Option<String>,
    pub status: Option<String>,
    pub comments: Option<String>,
}

impl RawScheduleItem {
    /// creationDate の日付部分
    pub fn creation_day(&self) -> Option<NaiveDate> {
        let raw = self.creation_date.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        let day = raw.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    fn title(&self) -> Option<String> {
        self.form_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// 詳細画面用のリモートレコード
///
/// フィードは検査結果を持たないので、連絡先と日付だけを埋める。
impl From<&RawScheduleItem> for SourceRecord {
    fn from(item: &RawScheduleItem) -> Self {
        let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();

        SourceRecord {
            application_details: ApplicationDetails {
                application_id: text(&item.id),
                inspection_date: item.creation_day().map(|d| d.to_string()).unwrap_or_default(),
                inspection_type: text(&item.form_name),
                contact_name: text(&item.inspector_name),
                ..Default::default()
            },
            inspection_details: None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// フィードへの問い合わせ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleQuery {
    /// 指定時は1件のみ
    pub id: Option<String>,
    /// 取得する項目（空なら全項目）
    pub fields: Vec<String>,
}

impl ScheduleQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// 詳細画面用の1件取得
    pub fn detail(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: ["formID", "formName", "inspectorName", "status", "comments"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// フィードのレスポンスを解析
pub fn parse_schedule_payload(payload: &Value) -> Result<Vec<RawScheduleItem>> {
    let Value::Object(map) = payload else {
        return Err(Error::MalformedSchedule(format!(
            "expected an object, got {}",
            kind_of(payload)
        )));
    };

    if let Some(items) = map.get("items") {
        let Value::Array(items) = items else {
            return Err(Error::MalformedSchedule("items is not an array".into()));
        };
        return items.iter().map(parse_item).collect();
    }

    if map.contains_key("creationDate") || map.contains_key("formID") {
        return Ok(vec![parse_item(payload)?]);
    }

    Err(Error::MalformedSchedule(
        "payload has neither items nor creationDate".into(),
    ))
}

fn parse_item(value: &Value) -> Result<RawScheduleItem> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::MalformedSchedule(format!("invalid schedule item: {}", e)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 1日分の索引エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub date: NaiveDate,
    /// 日付がリモート由来か
    pub from_remote: bool,
    pub inspections: Vec<InspectionSummary>,
}

impl DayEntry {
    /// "2 inspections" / "1 inspection"
    pub fn count_label(&self) -> String {
        let n = self.inspections.len();
        format!("{} inspection{}", n, if n == 1 { "" } else { "s" })
    }
}

/// 日付順のダッシュボード索引
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardIndex {
    days: Vec<DayEntry>,
}

impl DashboardIndex {
    /// リモート一覧と固定スケジュールをマージ
    ///
    /// 同じ位置にリモートの値があればそちらを優先する（日付は一意）:
    /// - i日目の日付 ← remote[i].creationDate
    /// - 各日のj件目の見出し ← remote[j].formName
    pub fn build(remote: &[RawScheduleItem], fallback: &[DaySchedule]) -> Self {
        let mut days: Vec<DayEntry> = Vec::with_capacity(fallback.len());

        for (i, day) in fallback.iter().enumerate() {
            let remote_date = remote.get(i).and_then(RawScheduleItem::creation_day);
            let date = remote_date.unwrap_or(day.date);
            let inspections = day.inspections.iter().enumerate().map(|(j, summary)| {
                let mut summary = summary.clone();
                if let Some(title) = remote.get(j).and_then(RawScheduleItem::title) {
                    summary.title = Some(title);
                }
                summary
            });

            // 日付が重なった日は先に現れたエントリへまとめる
            match days.iter_mut().find(|d| d.date == date) {
                Some(existing) => {
                    existing.from_remote |= remote_date.is_some();
                    existing.inspections.extend(inspections);
                }
                None => days.push(DayEntry {
                    date,
                    from_remote: remote_date.is_some(),
                    inspections: inspections.collect(),
                }),
            }
        }

        Self { days }
    }

    pub fn days(&self) -> &[DayEntry] {
        &self.days
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|d| d.date).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayEntry> {
        self.days.iter().find(|d| d.date == date)
    }

    /// 指定日の検査（種別で絞り込み可）
    pub fn inspections_for(
        &self,
        date: NaiveDate,
        type_filter: Option<InspectionType>,
    ) -> Vec<&InspectionSummary> {
        self.day(date)
            .map(|day| {
                day.inspections
                    .iter()
                    .filter(|s| type_filter.map_or(true, |t| s.inspection_type == t))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// IDで検査を探す
    pub fn find(&self, id: &str) -> Option<(&DayEntry, &InspectionSummary)> {
        self.days.iter().find_map(|day| {
            day.inspections
                .iter()
                .find(|s| s.id == id)
                .map(|s| (day, s))
        })
    }
}
