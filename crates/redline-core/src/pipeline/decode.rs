//! Image decoding to RGBA8 with format detection and timeout support.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::{DecodedImage, SourceFile};

/// Image decoder with configurable limits and timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode a source file, reading it from disk first.
    pub async fn decode(&self, source: &SourceFile) -> Result<DecodedImage, PipelineError> {
        let bytes = tokio::fs::read(&source.path)
            .await
            .map_err(|e| PipelineError::Decode {
                path: source.path.clone(),
                message: format!("Cannot read file: {}", e),
            })?;
        self.decode_from_bytes(bytes, source).await
    }

    /// Decode an in-memory byte buffer with validation and timeout.
    ///
    /// The decode itself runs on the blocking pool; the suspension here is
    /// the single wait point in a file's pipeline.
    pub async fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        source: &SourceFile,
    ) -> Result<DecodedImage, PipelineError> {
        let path_owned = source.path.clone();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_bytes_sync(bytes, &path_owned)).await
        })
        .await;

        match decode_result {
            Ok(Ok(Ok((width, height, pixels)))) => {
                if width > self.limits.max_image_dimension
                    || height > self.limits.max_image_dimension
                {
                    return Err(PipelineError::ImageTooLarge {
                        path: source.path.clone(),
                        width,
                        height,
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                Ok(DecodedImage {
                    source: source.clone(),
                    width,
                    height,
                    pixels,
                })
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Decode {
                path: source.path.clone(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: source.path.clone(),
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    ///
    /// Format is guessed from content, not the extension, and the result is
    /// always converted to RGBA8 so the comparator sees a uniform layout.
    fn decode_bytes_sync(
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<(u32, u32, Vec<u8>), PipelineError> {
        let cursor = Cursor::new(bytes);
        let reader = image::ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let rgba = image.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok((width, height, rgba.into_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) -> SourceFile {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        img.save(path).unwrap();
        SourceFile::from_path(path).unwrap()
    }

    #[tokio::test]
    async fn test_decode_produces_rgba8() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_png(&dir.path().join("solid.png"), 3, 2, [10, 20, 30, 255]);

        let decoder = ImageDecoder::new(LimitsConfig::default());
        let decoded = decoder.decode(&source).await.unwrap();

        assert_eq!(decoded.width, 3);
        assert_eq!(decoded.height, 2);
        assert_eq!(decoded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&decoded.pixels[..4], &[10, 20, 30, 255]);
    }

    #[tokio::test]
    async fn test_decode_detects_format_by_content() {
        // PNG bytes behind a .jpg extension still decode as PNG content.
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("real.png");
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        img.save(&png_path).unwrap();
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png_path, &misnamed).unwrap();
        let source = SourceFile::from_path(&misnamed).unwrap();

        let decoder = ImageDecoder::new(LimitsConfig::default());
        let decoded = decoder.decode(&source).await.unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 2));
    }

    #[tokio::test]
    async fn test_decode_rejects_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.png");
        std::fs::write(&path, b"this is not image data at all").unwrap();
        let source = SourceFile::from_path(&path).unwrap();

        let decoder = ImageDecoder::new(LimitsConfig::default());
        let err = decoder.decode(&source).await.unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_decode_rejects_oversized_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_png(&dir.path().join("wide.png"), 64, 1, [0, 0, 0, 255]);

        let limits = LimitsConfig {
            max_image_dimension: 32,
            ..LimitsConfig::default()
        };
        let decoder = ImageDecoder::new(limits);
        let err = decoder.decode(&source).await.unwrap_err();
        assert!(matches!(err, PipelineError::ImageTooLarge { .. }));
    }
}
