//! JSONファイルのレコードストア
//!
//! レコードを配列としてファイルに追記する。壊れたファイルは
//! 上書きせずエラーにする。

use super::{RecordStore, StoreError};
use async_trait::async_trait;
use inspection_common::InspectionRecord;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const RECORDS_FILE_NAME: &str = "inspections.json";

pub struct JsonRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// データディレクトリ直下の既定ファイル
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(RECORDS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 保存済みレコード一覧（ファイルがなければ空）
    pub async fn list(&self) -> Result<Vec<InspectionRecord>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn save(&self, record: &InspectionRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.list().await?;
        records.push(record.clone());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 一時ファイルに書いてから置き換える
        let content = serde_json::to_string_pretty(&records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::info!(
            application_id = %record.application_id,
            total = records.len(),
            "record saved"
        );
        Ok(())
    }
}
