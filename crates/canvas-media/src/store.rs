//! Scratch uploads and the published asset directory

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use canvas_common::StorageConfig;

use crate::error::MediaError;
use crate::watermark::{partial_path, watermark_file, watermark_text};

/// A published image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Path clients fetch the image from, e.g. `/artworks/watermarked-...png`
    pub public_path: String,
    /// Location on disk
    pub file_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ArtworkStore {
    upload_dir: PathBuf,
    asset_dir: PathBuf,
    url_prefix: String,
}

impl ArtworkStore {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        asset_dir: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            asset_dir: asset_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            config.upload_dir.clone(),
            config.asset_dir.clone(),
            config.asset_url_prefix.clone(),
        )
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create both directories if they are missing
    pub async fn ensure_dirs(&self) -> Result<(), MediaError> {
        fs::create_dir_all(&self.upload_dir).await?;
        fs::create_dir_all(&self.asset_dir).await?;
        Ok(())
    }

    pub fn public_path(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.url_prefix.trim_end_matches('/'))
    }

    /// Write raw upload bytes into the scratch directory
    pub async fn stage(&self, bytes: &[u8]) -> Result<PathBuf, MediaError> {
        fs::create_dir_all(&self.upload_dir).await?;
        let path = self.upload_dir.join(unique_name("upload", None));
        fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Watermark a staged upload and publish it
    ///
    /// The staged file is removed on success. When the image cannot be decoded it
    /// is left where it is.
    #[instrument(skip(self, artist_name), fields(temp = %temp_path.display()))]
    pub async fn ingest(
        &self,
        temp_path: &Path,
        artist_name: Option<&str>,
    ) -> Result<StoredImage, MediaError> {
        fs::create_dir_all(&self.asset_dir).await?;

        let file_name = unique_name("watermarked", Some("png"));
        let output = self.asset_dir.join(&file_name);
        let text = watermark_text(artist_name);

        let input = temp_path.to_path_buf();
        let target = output.clone();
        tokio::task::spawn_blocking(move || watermark_file(&input, &target, &text)).await??;

        if let Err(e) = fs::remove_file(temp_path).await {
            warn!(error = %e, "Failed to remove staged upload");
        }

        info!(file = %file_name, "Watermark added");
        Ok(StoredImage {
            public_path: self.public_path(&file_name),
            file_path: output,
        })
    }

    /// Publish an upload unchanged under `{prefix}-<millis>-<uuid>.<ext>`
    ///
    /// The extension follows the detected format. Bytes are written to a hidden
    /// sibling first and renamed into place.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save_original(&self, prefix: &str, bytes: &[u8]) -> Result<StoredImage, MediaError> {
        let format = image::guess_format(bytes)
            .ok()
            .filter(|f| f.reading_enabled())
            .ok_or(MediaError::UnsupportedFormat)?;
        let extension = format.extensions_str().first().copied().unwrap_or("img");

        fs::create_dir_all(&self.asset_dir).await?;
        let file_name = unique_name(prefix, Some(extension));
        let output = self.asset_dir.join(&file_name);
        let partial = partial_path(&output);

        let written = match fs::write(&partial, bytes).await {
            Ok(()) => fs::rename(&partial, &output).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&partial).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %cleanup, "Failed to remove partial file");
                }
            }
            return Err(e.into());
        }

        info!(file = %file_name, "Image saved");
        Ok(StoredImage {
            public_path: self.public_path(&file_name),
            file_path: output,
        })
    }

    /// Best-effort removal of a published file whose record was never stored
    pub async fn discard(&self, file_path: &Path) {
        if let Err(e) = fs::remove_file(file_path).await {
            warn!(path = %file_path.display(), error = %e, "Failed to remove orphaned asset");
        }
    }

    /// Stage and ingest in one step
    pub async fn publish(
        &self,
        bytes: &[u8],
        artist_name: Option<&str>,
    ) -> Result<StoredImage, MediaError> {
        let staged = self.stage(bytes).await?;
        self.ingest(&staged, artist_name).await
    }
}

fn unique_name(prefix: &str, extension: Option<&str>) -> String {
    let stem = format!("{prefix}-{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4());
    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}
