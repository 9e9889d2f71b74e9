//! Receipt image upload validation.
//!
//! Uploaded bytes are untrusted. A file is accepted only when it is
//! non-empty, within the size cap, carries an allowed image extension and
//! actually starts with the magic bytes of a supported format. The content
//! sniff is authoritative; the extension is just a cheap first gate.

use serde::Serialize;

/// Largest accepted upload in bytes (10MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// File extensions accepted for receipt photos, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"];

/// Image container identified from file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Tiff,
}

impl ImageFormat {
    /// MIME type to hand to the vision model.
    pub const fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Tiff => "image/tiff",
        }
    }
}

/// Upload rejection reasons.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("file is {size} bytes, the limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("extension '{extension}' is not an accepted image type")]
    UnsupportedExtension { extension: String },

    #[error("file content is not a recognized image format")]
    UnrecognizedFormat,
}

/// Identify an image format from its leading magic bytes.
pub fn detect_image_format(content: &[u8]) -> Option<ImageFormat> {
    if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }
    if content.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(ImageFormat::Png);
    }
    if content.starts_with(b"GIF87a") || content.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }
    if content.starts_with(b"BM") {
        return Some(ImageFormat::Bmp);
    }
    // RIFF is a generic container; bytes 8..12 say what it carries.
    if content.starts_with(b"RIFF") && content.get(8..12) == Some(&b"WEBP"[..]) {
        return Some(ImageFormat::Webp);
    }
    if content.starts_with(b"II*\0") || content.starts_with(b"MM\0*") {
        return Some(ImageFormat::Tiff);
    }
    None
}

/// Validate an uploaded receipt photo, returning the detected format.
pub fn validate_receipt_image(
    filename: &str,
    content: &[u8],
    max_bytes: usize,
) -> Result<ImageFormat, UploadError> {
    if content.is_empty() {
        return Err(UploadError::Empty);
    }

    if content.len() > max_bytes {
        return Err(UploadError::TooLarge {
            size: content.len(),
            max: max_bytes,
        });
    }

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedExtension { extension });
    }

    detect_image_format(content).ok_or(UploadError::UnrecognizedFormat)
}
