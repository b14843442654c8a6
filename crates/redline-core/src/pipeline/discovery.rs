//! File discovery for building an input set from a path argument.

use std::path::Path;
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::types::{file_name_of, SourceFile};

/// Discovers the files making up one input set.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Discover all files at a path.
    ///
    /// If path is a file, returns just that file. If path is a directory,
    /// returns every regular file in it (recursively unless configured
    /// otherwise). Files of unsupported types are included so validation
    /// can list them as rejections, the same way a file picker hands over
    /// whatever the user selected.
    pub fn discover(&self, path: &Path) -> Vec<SourceFile> {
        if path.is_file() {
            if let Ok(meta) = std::fs::metadata(path) {
                return vec![SourceFile {
                    path: path.to_path_buf(),
                    name: file_name_of(path),
                    byte_size: meta.len(),
                }];
            }
            return vec![];
        }

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(path)
            .max_depth(max_depth)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let entry_path = entry.path();
            if entry_path.is_file() {
                if let Ok(meta) = entry.metadata() {
                    files.push(SourceFile {
                        path: entry_path.to_path_buf(),
                        name: file_name_of(entry_path),
                        byte_size: meta.len(),
                    });
                }
            }
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }
}
