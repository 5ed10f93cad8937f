// src/menu_sync/services/upload_service.rs
// Photo uploads: re-encode picked files as WebP, assign ids, send, refresh.

use crate::client::SyncClient;
use crate::error::SyncError;
use crate::models::{Language, PhotoId, PhotoUpload, RawImage};
use crate::storage::QueryKey;
use crate::utils::image::encode_webp;
use crate::utils::progress::UploadProgress;
use futures::future::try_join_all;
use serde_bytes::ByteBuf;
use tracing::{debug, info};

impl SyncClient {
    /// Converts one file, with `index` as its position in the batch.
    async fn convert(&self, index: usize, file: &RawImage) -> Result<Vec<u8>, SyncError> {
        let encoded = encode_webp(&file.bytes, self.config.webp_quality, self.config.max_image_bytes)
            .map_err(|e| SyncError::conversion(index, &file.name, e))?;
        debug!(
            index,
            name = %file.name,
            raw = file.bytes.len(),
            webp = encoded.len(),
            "image converted"
        );
        Ok(encoded)
    }

    /// Uploads a single photo and returns the id it was stored under.
    pub async fn upload_photo(&self, language: Language, file: RawImage) -> Result<PhotoId, SyncError> {
        let actor = self.require_actor()?;
        let encoded = self.convert(0, &file).await?;
        let id = self.ids.next_id(0);
        let upload = PhotoUpload {
            id: id.clone(),
            image: ByteBuf::from(encoded),
            name: file.name,
        };

        self.remote("add_photo", actor.add_photo(language, upload)).await?;
        info!(%language, %id, "photo uploaded");
        self.invalidate(QueryKey::MenuPhotos(language)).await;
        Ok(id)
    }

    /// Uploads `files` as one batch and returns their ids in input order.
    ///
    /// Conversions run concurrently. The first file that fails to convert
    /// aborts the batch before anything is sent, and `progress` goes back to zero.
    ///
    /// # Errors
    ///
    /// `SyncError::Conversion` naming the failed file, or the actor's error.
    pub async fn upload_photos(
        &self,
        language: Language,
        files: Vec<RawImage>,
        progress: &UploadProgress,
    ) -> Result<Vec<PhotoId>, SyncError> {
        let actor = self.require_actor()?;
        if files.is_empty() {
            return Ok(Vec::new());
        }
        progress.reset(files.len());

        let conversions = files.iter().enumerate().map(|(index, file)| self.convert(index, file));
        let encoded = match try_join_all(conversions).await {
            Ok(encoded) => encoded,
            Err(e) => {
                progress.reset(0);
                return Err(e);
            }
        };

        let ids = self.ids.batch(files.len());
        let uploads: Vec<PhotoUpload> = ids
            .iter()
            .zip(files)
            .zip(encoded)
            .map(|((id, file), bytes)| PhotoUpload {
                id: id.clone(),
                image: ByteBuf::from(bytes),
                name: file.name,
            })
            .collect();

        if let Err(e) = self
            .remote("add_photos", actor.add_photos(language, uploads, progress))
            .await
        {
            progress.reset(0);
            return Err(e);
        }
        progress.complete_all();
        info!(%language, count = ids.len(), "photo batch uploaded");

        self.invalidate(QueryKey::MenuPhotos(language)).await;
        Ok(ids)
    }
}
