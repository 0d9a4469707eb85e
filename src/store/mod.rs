//! 保存先（画像ストア・レコードストア）
//!
//! 提出パイプラインに注入される外部コラボレータ。
//! タイムアウトや再試行は各実装の責務。

mod image_dir;
mod memory;
mod records;

pub use image_dir::DirImageStore;
pub use memory::{MemoryImageStore, MemoryRecordStore};
pub use records::JsonRecordStore;

use async_trait::async_trait;
use inspection_common::{InspectionRecord, StagedImage};
use std::sync::Arc;
use thiserror::Error;

/// ストアのエラー（Display はそのままユーザーに表示される）
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// 画像ストア
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// 画像をアップロードして安定したURLを返す
    ///
    /// 同じ画像で再度呼んでも新しい資産として扱ってよい。
    async fn upload(&self, image: &StagedImage) -> Result<String, StoreError>;
}

/// レコードストア
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// レコードを保存（部分書き込みはしない）
    async fn save(&self, record: &InspectionRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ImageStore + ?Sized> ImageStore for Arc<T> {
    async fn upload(&self, image: &StagedImage) -> Result<String, StoreError> {
        (**self).upload(image).await
    }
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn save(&self, record: &InspectionRecord) -> Result<(), StoreError> {
        (**self).save(record).await
    }
}
