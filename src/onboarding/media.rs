//! KTP photo capture — turns a selected image into a `data:` URI preview.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::MediaError;

use super::model::KtpPhoto;

/// A user-chosen image file held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageSelection {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSelection")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageSelection {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing its mime type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, MediaError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("ktp")
            .to_string();
        Ok(Self::new(file_name, guess_mime_type(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Guess an image mime type from a file extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Encode bytes as a `data:<mime>;base64,<payload>` URI.
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Convert a selection into a photo with its preview.
///
/// The encoding runs on the blocking pool; there is no progress reporting
/// and no way to cancel it once started.
pub async fn capture(selection: ImageSelection) -> Result<KtpPhoto, MediaError> {
    if selection.bytes.is_empty() {
        return Err(MediaError::Empty {
            file_name: selection.file_name,
        });
    }
    if !selection.is_image() {
        return Err(MediaError::NotAnImage {
            file_name: selection.file_name,
            mime_type: selection.mime_type,
        });
    }

    let file_name = selection.file_name.clone();
    tokio::task::spawn_blocking(move || {
        let preview = to_data_url(&selection.mime_type, &selection.bytes);
        KtpPhoto {
            image: selection,
            preview,
        }
    })
    .await
    .map_err(|e| MediaError::Conversion {
        file_name,
        reason: e.to_string(),
    })
}

/// Read and convert an image file in one go.
pub async fn capture_path(path: &Path) -> Result<KtpPhoto, MediaError> {
    let selection = ImageSelection::from_path(path).await?;
    capture(selection).await
}
