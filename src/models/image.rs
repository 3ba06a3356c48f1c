use std::path::Path;

use base64::{Engine as _, engine::general_purpose};

use crate::error::{AppError, AppResult};

/// One entry of a product's image list while it is being edited.
///
/// Images read from the backend are URLs; images added in the console are held
/// as raw bytes until submission, when they are sent inline as `data:` URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductImage {
    Remote(String),
    Pending { mime_type: String, data: Vec<u8> },
}

impl ProductImage {
    pub fn remote(url: impl Into<String>) -> Self {
        ProductImage::Remote(url.into())
    }

    pub fn pending(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        ProductImage::Pending {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read an image file from disk. The MIME type is taken from the extension;
    /// unknown extensions are sent as `application/octet-stream`.
    pub async fn from_file(path: &Path) -> AppResult<Self> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::IoError(format!("Failed to read image {}: {}", path.display(), e))
        })?;
        Ok(Self::pending(mime_type_for_path(path), data))
    }

    /// Value sent in the `product_image[]` multipart field.
    pub fn to_form_value(&self) -> String {
        match self {
            ProductImage::Remote(url) => url.clone(),
            ProductImage::Pending { mime_type, data } => encode_data_uri(mime_type, data),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ProductImage::Pending { .. })
    }

    /// Short human-readable description for terminal output.
    pub fn describe(&self) -> String {
        match self {
            ProductImage::Remote(url) => url.clone(),
            ProductImage::Pending { mime_type, data } => {
                format!("new {} image ({} bytes)", mime_type, data.len())
            }
        }
    }
}

pub fn encode_data_uri(mime_type: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(data)
    )
}

/// Get image MIME type from file extension
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}
