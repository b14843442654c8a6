//! Core data types for the comparison pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::media::format_size;

/// Which of the two input sets a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetId {
    One,
    Two,
}

impl SetId {
    /// The counterpart set.
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Zero-based index for slot-table storage.
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("set 1"),
            Self::Two => f.write_str("set 2"),
        }
    }
}

/// A file picked into one of the input sets.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,

    /// Just the filename portion
    pub name: String,

    /// File size in bytes
    pub byte_size: u64,
}

impl SourceFile {
    /// Build a source file from a path, reading its size from disk.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            name: file_name_of(path),
            byte_size: metadata.len(),
        })
    }

    /// The pairing key: the file name with the first `.` removed.
    ///
    /// Only the first dot is stripped, not the extension, so `a.b.png`
    /// normalizes to `ab.png`. Files in opposite sets pair when their
    /// normalized names match.
    pub fn normalized_name(&self) -> String {
        self.name.replacen('.', "", 1)
    }
}

/// The filename portion of a path, lossily converted.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// A source file with its pixels decoded to RGBA8.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// The file this image came from
    pub source: SourceFile,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// RGBA8 pixel data, `width * height * 4` bytes
    pub pixels: Vec<u8>,
}

/// The rendered diff for one matched pair.
///
/// Dimensions come from the set-1 image; the buffer is the comparator
/// output and is never mutated after creation.
#[derive(Debug, Clone)]
pub struct DiffResult {
    /// Original file name of the matched pair
    pub title: String,

    /// Width of the set-1 image
    pub width: u32,

    /// Height of the set-1 image
    pub height: u32,

    /// RGBA8 diff buffer with differing pixels painted opaque red
    pub pixels: Vec<u8>,

    /// Byte size of the set-1 source file, for the results listing
    pub source_size: u64,
}

/// Terminal display state of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Valid media type; decoded or still decoding
    Accepted,

    /// Media type outside the accepted set, or over the size limit
    Rejected { reason: String },

    /// Decode errored or timed out
    DecodeFailed { message: String },
}

/// One line of a per-set listing, serializable for run reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// The set this file was selected into
    pub set: SetId,

    /// Original file name
    pub name: String,

    /// File size in bytes
    pub size: u64,

    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileRecord {
    /// The listing line shown for this file.
    pub fn display_line(&self) -> String {
        match &self.status {
            FileStatus::Accepted => {
                format!("File name {}, file size {}.", self.name, format_size(self.size))
            }
            FileStatus::Rejected { reason } => format!("File name {}: {reason}", self.name),
            FileStatus::DecodeFailed { message } => {
                format!("File name {}: decode failed ({message}).", self.name)
            }
        }
    }
}

/// Summary counters for one compare run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunStats {
    /// Files that passed validation across both sets
    pub accepted: usize,

    /// Files rejected before decode
    pub rejected: usize,

    /// Files whose decode errored or timed out
    pub decode_failed: usize,

    /// Pairs compared
    pub compared: usize,

    /// Decoded files with no counterpart in the other set
    pub unmatched: usize,

    /// Total wall-clock time in seconds
    pub total_seconds: f64,
}
