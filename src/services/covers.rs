//! Cover image storage
//!
//! Covers arrive either as an uploaded image file, written under the public
//! cover directory and served statically, or as a JSON text field carrying a
//! base64 payload, decoded and kept in the book row.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{
    config::UploadsConfig,
    error::{AppError, AppResult},
    models::book::CoverImage,
};

/// Accepted image kinds, checked against both the file name and its MIME type
static IMAGE_FILE_TYPES: Lazy<Regex> =
    Lazy::new(|| Regex::new("jpeg|jpg|png|jfif").expect("static pattern"));

/// MIME types accepted for encoded covers
pub const ENCODED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

pub const IMAGES_ONLY: &str = "Error: Images only";
pub const FILE_TOO_LARGE: &str = "Error: File too large";

/// Names tried when uploads land in the same millisecond
const MAX_NAME_ATTEMPTS: usize = 64;

/// A file part received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Cover as submitted, before it is stored
#[derive(Debug, Clone)]
pub enum CoverUpload {
    File(UploadedFile),
    Encoded(String),
}

#[derive(Deserialize)]
struct EncodedCover {
    #[serde(rename = "type")]
    mime_type: String,
    data: String,
}

#[derive(Clone)]
pub struct CoverStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl CoverStore {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            dir: config.cover_dir(),
            max_bytes: config.max_cover_bytes,
        }
    }

    /// Store or decode a submitted cover. `Ok(None)` means nothing usable was
    /// submitted (no file chosen, empty encoded field).
    pub async fn accept(&self, upload: CoverUpload) -> AppResult<Option<CoverImage>> {
        match upload {
            CoverUpload::File(file) => self.store_file(&file).await.map(Some),
            CoverUpload::Encoded(raw) => self.decode(&raw),
        }
    }

    /// Validate an uploaded image and write it under the cover directory
    pub async fn store_file(&self, file: &UploadedFile) -> AppResult<CoverImage> {
        self.check_file(file)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        self.write_new(file, Utc::now().timestamp_millis()).await
    }

    /// Write under the first free name from `millis` on. Existing covers are
    /// never overwritten.
    async fn write_new(&self, file: &UploadedFile, mut millis: i64) -> AppResult<CoverImage> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = cover_file_name(&file.field_name, &file.file_name, millis);
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&name))
                .await;

            let mut out = match opened {
                Ok(out) => out,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    millis += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            out.write_all(&file.data).await?;
            out.flush().await?;

            tracing::debug!("Stored cover {} ({} bytes)", name, file.data.len());
            return Ok(CoverImage::File { name });
        }

        Err(AppError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "no free cover file name",
        )))
    }

    fn check_file(&self, file: &UploadedFile) -> AppResult<()> {
        if file.data.len() > self.max_bytes {
            return Err(AppError::Upload(FILE_TOO_LARGE.to_string()));
        }
        if !IMAGE_FILE_TYPES.is_match(&file.file_name) || !IMAGE_FILE_TYPES.is_match(&file.content_type) {
            return Err(AppError::Upload(IMAGES_ONLY.to_string()));
        }
        Ok(())
    }

    /// Decode a `{"type": ..., "data": <base64>}` cover field
    pub fn decode(&self, raw: &str) -> AppResult<Option<CoverImage>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let cover: EncodedCover = serde_json::from_str(raw)
            .map_err(|_| AppError::Upload("Error: Invalid cover data".to_string()))?;
        if !ENCODED_MIME_TYPES.contains(&cover.mime_type.as_str()) {
            return Err(AppError::Upload(IMAGES_ONLY.to_string()));
        }

        let data = STANDARD
            .decode(cover.data.trim())
            .map_err(|e| AppError::Upload(format!("Error: Invalid cover data ({})", e)))?;
        if data.len() > self.max_bytes {
            return Err(AppError::Upload(FILE_TOO_LARGE.to_string()));
        }

        Ok(Some(CoverImage::Encoded {
            data,
            mime_type: cover.mime_type,
        }))
    }

    /// Remove a stored cover file. Failures are logged only.
    pub async fn remove(&self, name: &str) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::warn!("Could not remove cover {}: {}", name, e);
        }
    }
}

/// `{field}-{millis}-{.ext}`, keeping the original extension with its dot
fn cover_file_name(field_name: &str, original: &str, millis: i64) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!("{}-{}-{}", field_name, millis, ext)
}
