//! Content type detection from file contents

use sunshade_core::constants::FALLBACK_CONTENT_TYPE;

/// MIME type and file extension derived from a file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedType {
    pub content_type: &'static str,
    pub extension: &'static str,
}

const FALLBACK: DetectedType = DetectedType {
    content_type: FALLBACK_CONTENT_TYPE,
    extension: "jpg",
};

/// Detect the content type from magic bytes, falling back to JPEG.
pub fn detect(data: &[u8]) -> DetectedType {
    if data.starts_with(b"%PDF") {
        return DetectedType {
            content_type: "application/pdf",
            extension: "pdf",
        };
    }

    match image::guess_format(data) {
        Ok(format) => DetectedType {
            content_type: format.to_mime_type(),
            extension: format.extensions_str().first().copied().unwrap_or("bin"),
        },
        Err(_) => FALLBACK,
    }
}
