//! 提出パイプライン
//!
//! 画像アップロード → レコード保存 を厳密に順番に実行する。
//! - 画像があればアップロード完了後に保存を開始し、保存には安定URLのみ渡す
//! - アップロード失敗時は何も保存しない
//! - 保存失敗時、アップロード済みの画像は残る（掃除しない）
//! - 自動再試行はしない。再提出のたびに画像は再アップロードされる

use crate::store::{ImageStore, RecordStore};
use chrono::Utc;
use inspection_common::{
    ContactDetails, FormValues, GeneralQuestions, InspectionRecord, InspectionStatus,
    InspectionType, Lifecycle, Photo, StagedImage, SubmissionError,
};

/// 提出内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub values: FormValues,
    pub inspection_type: InspectionType,
    pub inspection_name: String,
}

impl Draft {
    /// フォーム値からレコードを作る（picture_url は確定済みURL）
    pub fn into_record(self, picture_url: Option<String>) -> InspectionRecord {
        let v = self.values;
        let url = picture_url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| Some(v.picture_url.clone()).filter(|u| !u.trim().is_empty()));

        InspectionRecord {
            application_id: v.application_id.trim().to_string(),
            contact: ContactDetails {
                first_name: v.first_name,
                last_name: v.last_name,
                phone: v.phone,
                email: v.contact,
                property_address: v.location,
            },
            general: GeneralQuestions {
                washbasin: v.is_washbasin,
                refrigerator: v.is_refrigerator,
                garage: v.is_garage,
                notes: v.generic_question4,
            },
            photo: url.map(|url| Photo {
                url,
                caption: v.picture_comment,
            }),
            inspection_type: self.inspection_type,
            inspection_name: self.inspection_name,
            status: InspectionStatus::Completed,
            created_at: Utc::now(),
        }
    }
}

pub struct SubmissionPipeline<I, R> {
    images: I,
    records: R,
}

impl<I: ImageStore, R: RecordStore> SubmissionPipeline<I, R> {
    pub fn new(images: I, records: R) -> Self {
        Self { images, records }
    }

    pub fn images(&self) -> &I {
        &self.images
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub async fn submit(
        &self,
        draft: Draft,
        image: Option<&StagedImage>,
    ) -> Result<InspectionRecord, SubmissionError> {
        self.submit_with(draft, image, |_| {}).await
    }

    /// フェーズ変化（Uploading / Saving）を通知しながら提出
    pub async fn submit_with<F>(
        &self,
        draft: Draft,
        image: Option<&StagedImage>,
        mut on_phase: F,
    ) -> Result<InspectionRecord, SubmissionError>
    where
        F: FnMut(Lifecycle) + Send,
    {
        let uploaded_url = match image {
            Some(image) => {
                on_phase(Lifecycle::Uploading);
                let url = self.images.upload(image).await.map_err(|e| {
                    tracing::warn!(file = %image.file_name, error = %e, "image upload failed");
                    SubmissionError::Upload(e.to_string())
                })?;
                tracing::info!(file = %image.file_name, %url, "image uploaded");
                Some(url)
            }
            None => None,
        };

        on_phase(Lifecycle::Saving);
        let record = draft.into_record(uploaded_url);
        self.records.save(&record).await.map_err(|e| {
            if record.photo.is_some() {
                tracing::warn!(
                    application_id = %record.application_id,
                    "record not saved; uploaded image left orphaned"
                );
            }
            SubmissionError::Persist(e.to_string())
        })?;

        tracing::info!(application_id = %record.application_id, "inspection submitted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryImageStore, MemoryRecordStore, StoreError};
    use async_trait::async_trait;

    fn draft() -> Draft {
        Draft {
            values: FormValues {
                application_id: " A1 ".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                contact: "jane@example.com".to_string(),
                phone: "123".to_string(),
                location: "X".to_string(),
                is_garage: true,
                picture_comment: "porch".to_string(),
                ..Default::default()
            },
            inspection_type: InspectionType::Residential,
            inspection_name: "Residential Inspection".to_string(),
        }
    }

    struct FailingImages;

    #[async_trait]
    impl ImageStore for FailingImages {
        async fn upload(&self, _image: &StagedImage) -> Result<String, StoreError> {
            Err(StoreError::Transport("network unreachable".to_string()))
        }
    }

    #[test]
    fn test_into_record_maps_fields() {
        let record = draft().into_record(Some("memory://1.jpg".to_string()));
        assert_eq!(record.application_id, "A1");
        assert_eq!(record.contact.email, "jane@example.com");
        assert_eq!(record.contact.property_address, "X");
        assert!(record.general.garage);
        assert_eq!(record.status, InspectionStatus::Completed);
        let photo = record.photo.expect("写真があるはず");
        assert_eq!(photo.url, "memory://1.jpg");
        assert_eq!(photo.caption, "porch");
    }

    #[test]
    fn test_into_record_without_picture() {
        let record = draft().into_record(None);
        assert!(record.photo.is_none());
    }

    #[tokio::test]
    async fn test_submit_uploads_then_saves() {
        let pipeline = SubmissionPipeline::new(MemoryImageStore::new(), MemoryRecordStore::new());
        let image = StagedImage::new("/photos/porch.jpg");
        let mut phases = Vec::new();

        let record = pipeline
            .submit_with(draft(), Some(&image), |p| phases.push(p))
            .await
            .expect("提出失敗");

        assert_eq!(phases, vec![Lifecycle::Uploading, Lifecycle::Saving]);
        assert_eq!(pipeline.images().uploads(), vec![image]);
        assert_eq!(pipeline.records().records(), vec![record.clone()]);
        assert_eq!(record.photo.unwrap().url, "memory://images/1/porch.jpg");
    }

    #[tokio::test]
    async fn test_submit_without_image_skips_upload() {
        let pipeline = SubmissionPipeline::new(MemoryImageStore::new(), MemoryRecordStore::new());
        let mut phases = Vec::new();

        pipeline
            .submit_with(draft(), None, |p| phases.push(p))
            .await
            .expect("提出失敗");

        assert_eq!(phases, vec![Lifecycle::Saving]);
        assert!(pipeline.images().uploads().is_empty());
        assert_eq!(pipeline.records().records().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_persist() {
        let pipeline = SubmissionPipeline::new(FailingImages, MemoryRecordStore::new());
        let image = StagedImage::new("/photos/porch.jpg");

        let err = pipeline.submit(draft(), Some(&image)).await.unwrap_err();
        assert_eq!(err, SubmissionError::Upload("network unreachable".to_string()));
        assert!(pipeline.records().records().is_empty());
    }
}
