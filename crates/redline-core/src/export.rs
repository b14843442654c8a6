//! Export of diff results to disk.
//!
//! Saved bytes are always PNG-encoded regardless of the source extension,
//! while the file keeps the pair's original name — the same shape a canvas
//! download gives: default encoding, suggested filename.

use image::RgbaImage;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::types::DiffResult;

/// Minimum result count before bulk export is offered.
const BULK_THRESHOLD: usize = 2;

/// Writes diff results to an output directory.
pub struct Exporter {
    out_dir: PathBuf,
}

impl Exporter {
    /// Create an exporter targeting the given directory.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// The directory results are written into.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Whether bulk export should be offered for this result list.
    pub fn bulk_available(results: &[DiffResult]) -> bool {
        results.len() >= BULK_THRESHOLD
    }

    /// Save a single result under its original file name.
    pub fn export_one(&self, result: &DiffResult) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(&self.out_dir).map_err(|e| PipelineError::Export {
            path: self.out_dir.clone(),
            message: format!("Cannot create output directory: {}", e),
        })?;

        let path = self.out_dir.join(&result.title);
        let image = render(result)?;
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| PipelineError::Export {
                path: path.clone(),
                message: e.to_string(),
            })?;
        tracing::debug!("Exported {}", path.display());
        Ok(path)
    }

    /// Save every result, in list order.
    pub fn export_all(&self, results: &[DiffResult]) -> Result<Vec<PathBuf>, PipelineError> {
        results.iter().map(|r| self.export_one(r)).collect()
    }
}

/// Rebuild the RGBA image for a result, clamping the buffer to the stated
/// dimensions. The comparator's output can be longer than the set-1 frame
/// when set 2's image was larger; only the frame is exported.
fn render(result: &DiffResult) -> Result<RgbaImage, PipelineError> {
    let expected = result.width as usize * result.height as usize * 4;
    let mut pixels = result.pixels.clone();
    pixels.resize(expected, 0);
    RgbaImage::from_raw(result.width, result.height, pixels).ok_or_else(|| {
        PipelineError::Export {
            path: PathBuf::from(&result.title),
            message: "pixel buffer does not match stated dimensions".to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str, width: u32, height: u32) -> DiffResult {
        DiffResult {
            title: title.to_string(),
            width,
            height,
            pixels: vec![128; (width * height * 4) as usize],
            source_size: 1000,
        }
    }

    #[test]
    fn test_export_one_writes_png_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        let path = exporter.export_one(&sample("cat.png", 2, 2)).unwrap();
        assert_eq!(path, dir.path().join("cat.png"));

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[test]
    fn test_export_keeps_original_name_with_png_content() {
        // A .gif title still gets PNG bytes, like a canvas download.
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        let path = exporter.export_one(&sample("anim.gif", 2, 2)).unwrap();
        assert_eq!(path.file_name().unwrap(), "anim.gif");
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[test]
    fn test_export_all_in_list_order() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        let results = vec![sample("first.png", 2, 2), sample("second.png", 2, 2)];
        let paths = exporter.export_all(&results).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].file_name().unwrap(), "first.png");
        assert_eq!(paths[1].file_name().unwrap(), "second.png");
    }

    #[test]
    fn test_export_clamps_oversized_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        // Buffer longer than the stated 2x2 frame: export only the frame.
        let mut result = sample("wide.png", 2, 2);
        result.pixels = vec![200; 5 * 5 * 4];
        let path = exporter.export_one(&result).unwrap();

        let reloaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(reloaded.dimensions(), (2, 2));
    }

    #[test]
    fn test_bulk_available_threshold() {
        assert!(!Exporter::bulk_available(&[]));
        assert!(!Exporter::bulk_available(&[sample("a.png", 1, 1)]));
        assert!(Exporter::bulk_available(&[
            sample("a.png", 1, 1),
            sample("b.png", 1, 1)
        ]));
    }
}
