//! ディレクトリ画像ストア
//!
//! 選択された画像を保存先ディレクトリへコピーし、`file://` URLを返す。
//! ファイル名は内容のSHA-256 + タイムスタンプ（毎回新しい資産になる）。

use super::{ImageStore, StoreError};
use async_trait::async_trait;
use inspection_common::StagedImage;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub struct DirImageStore {
    root: PathBuf,
}

impl DirImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// 内容ハッシュ（先頭16桁）
pub(crate) fn content_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)[..16].to_string()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "jpg".to_string())
}

#[async_trait]
impl ImageStore for DirImageStore {
    async fn upload(&self, image: &StagedImage) -> Result<String, StoreError> {
        let bytes = tokio::fs::read(image.path()).await.map_err(|e| {
            StoreError::Transport(format!("Failed to read {}: {}", image.path().display(), e))
        })?;

        tokio::fs::create_dir_all(&self.root).await?;

        let name = format!(
            "{}-{}.{}",
            content_digest(&bytes),
            chrono::Utc::now().timestamp_millis(),
            extension_of(image.path())
        );
        let target = self.root.join(name);
        tokio::fs::write(&target, &bytes).await?;

        let absolute = tokio::fs::canonicalize(&target).await.unwrap_or(target);
        tracing::info!(file = %image.file_name, target = %absolute.display(), "image stored");
        Ok(format!("file://{}", absolute.display()))
    }
}
