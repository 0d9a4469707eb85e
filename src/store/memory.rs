//! メモリ上のストア（テスト・ドライラン用）

use super::{ImageStore, RecordStore, StoreError};
use async_trait::async_trait;
use inspection_common::{InspectionRecord, StagedImage};
use parking_lot::Mutex;

/// アップロードされた画像パスを記録し、`memory://` URLを返す
#[derive(Default)]
pub struct MemoryImageStore {
    uploads: Mutex<Vec<StagedImage>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<StagedImage> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(&self, image: &StagedImage) -> Result<String, StoreError> {
        let mut uploads = self.uploads.lock();
        uploads.push(image.clone());
        Ok(format!("memory://images/{}/{}", uploads.len(), image.file_name))
    }
}

/// 保存されたレコードを保持
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<InspectionRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<InspectionRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn save(&self, record: &InspectionRecord) -> Result<(), StoreError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
