//! Media type classification and display-size formatting.
//!
//! The accepted set mirrors the image media types browsers admit through a
//! file picker. Classification is extension-derived, the same signal a
//! browser uses to populate `file.type` for local selections.

use std::fmt;
use std::path::Path;

/// Image media types accepted for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Apng,
    Bmp,
    Gif,
    Jpeg,
    Pjpeg,
    Png,
    Svg,
    Tiff,
    Webp,
    Icon,
}

impl MediaType {
    /// Classify a file by its extension (case-insensitive).
    ///
    /// Returns `None` for files outside the accepted set, including files
    /// with no extension at all.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        match ext.to_lowercase().as_str() {
            "apng" => Some(Self::Apng),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "jfif" | "pjpeg" | "pjp" => Some(Self::Pjpeg),
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::Webp),
            "ico" | "cur" => Some(Self::Icon),
            _ => None,
        }
    }

    /// The IANA media type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apng => "image/apng",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Pjpeg => "image/pjpeg",
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::Tiff => "image/tiff",
            Self::Webp => "image/webp",
            Self::Icon => "image/x-icon",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a byte count the way the file listings display it.
///
/// Sizes below 1KiB show the raw count, everything else one decimal place:
/// `1023bytes`, `1.0KB`, `1.0MB`. No space before the unit.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes}bytes")
    } else if bytes < 1_048_576 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1}MB", bytes as f64 / 1_048_576.0)
    }
}
