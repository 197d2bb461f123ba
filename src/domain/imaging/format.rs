//! Magic-byte image format detection
//!
//! Uploaded bytes are classified by signature, never by the declared MIME
//! type. The accepted set is narrower than the detected set: GIF and BMP are
//! recognized so they can be rejected with a precise message instead of a
//! generic decode failure.

use std::fmt;

/// Image format detected from a byte signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
}

impl ImageFormat {
    /// Detect the format from the leading bytes of a buffer.
    ///
    /// Returns `None` when no known signature matches.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }
        if bytes.starts_with(b"GIF") {
            return Some(Self::Gif);
        }
        if bytes.starts_with(&[0x42, 0x4D]) {
            return Some(Self::Bmp);
        }
        if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        None
    }

    /// Whether this format is accepted by upload policy.
    ///
    /// GIF and BMP are detected but refused.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::WebP)
    }

    /// The canonical MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::WebP => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
            Self::Gif => write!(f, "GIF"),
            Self::Bmp => write!(f, "BMP"),
            Self::WebP => write!(f, "WebP"),
        }
    }
}
