//! 画像選択
//!
//! 選択された画像は拡張子と読み込み可否（寸法が取れるか）を確認してから
//! フォームに渡す。`None` はキャンセル。

use crate::error::{InspectionError, Result};
use async_trait::async_trait;
use dialoguer::Input;
use inspection_common::StagedImage;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick(&self) -> Result<Option<StagedImage>>;
}

/// 対応する拡張子か（大文字小文字を区別しない）
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// 画像ファイルを確認して StagedImage にする
pub fn inspect_image(path: &Path) -> Result<StagedImage> {
    if !path.is_file() {
        return Err(InspectionError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    if !is_image_extension(&ext) {
        return Err(InspectionError::ImageLoad(format!(
            "{} (supported: jpg, jpeg, png)",
            path.display()
        )));
    }

    let (width, height) = image::image_dimensions(path)
        .map_err(|e| InspectionError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), width, height, "image selected");

    Ok(StagedImage::new(path))
}

/// 固定パスを選択する（非対話モード）
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ImagePicker for PathPicker {
    async fn pick(&self) -> Result<Option<StagedImage>> {
        match &self.path {
            Some(path) => inspect_image(path).map(Some),
            None => Ok(None),
        }
    }
}

/// 端末でパスを入力させる（空入力はキャンセル）
pub struct PromptPicker;

#[async_trait]
impl ImagePicker for PromptPicker {
    async fn pick(&self) -> Result<Option<StagedImage>> {
        let input = tokio::task::spawn_blocking(|| {
            Input::<String>::new()
                .with_prompt("Photo path (empty to cancel)")
                .allow_empty(true)
                .interact_text()
        })
        .await
        .map_err(|e| InspectionError::Prompt(e.to_string()))?
        .map_err(|e| InspectionError::Prompt(e.to_string()))?;

        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        inspect_image(Path::new(input)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("png"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("gif"));
    }

    #[test]
    fn test_inspect_missing_file() {
        let err = inspect_image(Path::new("/nonexistent/photo.jpg")).unwrap_err();
        assert!(matches!(err, InspectionError::FileNotFound(_)));
    }

    #[test]
    fn test_inspect_wrong_extension() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = inspect_image(&path).unwrap_err();
        assert!(matches!(err, InspectionError::ImageLoad(_)));
    }

    #[test]
    fn test_inspect_undecodable_image() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        assert!(matches!(inspect_image(&path), Err(InspectionError::ImageLoad(_))));
    }

    #[test]
    fn test_inspect_valid_png() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tiny.png");
        image::RgbImage::new(4, 3).save(&path).expect("PNG保存失敗");

        let staged = inspect_image(&path).expect("有効なPNG");
        assert_eq!(staged.file_name, "tiny.png");
    }

    #[tokio::test]
    async fn test_path_picker_none_is_cancel() {
        assert_eq!(PathPicker::new(None).pick().await.unwrap(), None);
    }
}
