//! Zip packaging for parsed structures and on-disk trees.
//!
//! # Architecture
//!
//! - `builder.rs` - Archive assembly (structure and directory sources)
//! - `options.rs` - Compression, timestamps, progress, cancellation
//! - `report.rs` - What was written and what was skipped
//!
//! Per-entry problems degrade to skips recorded in the report; stream-level
//! problems abort the whole build. Nothing here re-trusts its input: paths
//! are validated again before they become entry names.

pub use builder::{build_from_directory, build_from_structure, zip_directory, zip_structure};
pub use error::{Error, Result};
pub use options::{BuildOptions, CompressionLevel, Progress};
pub use report::{ArchiveReport, SkippedEntry};

mod builder;
mod error;
mod options;
mod report;
