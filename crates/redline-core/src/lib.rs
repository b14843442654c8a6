//! Redline Core - Image set comparison library.
//!
//! Redline pairs same-named image files across two input sets and renders a
//! diff image per pair, painting every pixel that differs beyond a tolerance
//! threshold opaque red.
//!
//! # Architecture
//!
//! A pure event-driven pipeline with no persistent state:
//!
//! ```text
//! Select → Validate → Decode → Pair by name → Compare → Export
//! ```
//!
//! Files decode concurrently; pairing and comparison happen on decode
//! completion, so the result list is ordered by completion, not selection.
//!
//! # Usage
//!
//! ```rust,ignore
//! use redline_core::{Config, SetId, SourceFile, StagingEngine};
//!
//! #[tokio::main]
//! async fn main() -> redline_core::Result<()> {
//!     let config = Config::load()?;
//!     let mut engine = StagingEngine::new(&config);
//!
//!     engine.select(SetId::One, vec![SourceFile::from_path("before/cat.png".as_ref())?]);
//!     engine.select(SetId::Two, vec![SourceFile::from_path("after/cat.png".as_ref())?]);
//!     engine.settle().await;
//!
//!     println!("{} pair(s) compared", engine.results().len());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod media;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use compare::Tolerance;
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, RedlineError, Result};
pub use export::Exporter;
pub use media::{format_size, MediaType};
pub use pipeline::{FileDiscovery, ImageDecoder, StagingEngine, Validator};
pub use report::{DiffRecord, ReportFormat, ReportRecord, ReportWriter};
pub use types::{
    DecodedImage, DiffResult, FileRecord, FileStatus, RunStats, SetId, SourceFile,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
