//! Recursive archive discovery and extraction.
//!
//! # Architecture
//!
//! - `locate.rs` - Directory walking, archive discovery
//! - `format.rs` - Format recognition, tar codecs
//! - `sanitize.rs` - Entry-path sanitization (zip-slip prevention)
//! - `extract/` - Per-format extractors
//! - `run.rs` - Orchestration, per-archive outcomes, run summary
//! - `entry.rs` - Extraction report types

pub use entry::{ArchiveReport, Entry, EntryKind};
pub use error::{Error, Result};
pub use extract::{ArchiveExtractor, TarExtractor, ZipExtractor, extract_path, extractor_for};
pub use format::{ArchiveFormat, TarCompress, archive_stem};
pub use locate::{ArchiveLocator, Located};
pub use options::ExtractOptions;
pub use run::{
    ArchiveOutcome, FailureKind, Outcome, RunConfig, RunReport, RunSummary, SkipReason, run,
};
pub use sanitize::{SanitizedPath, sanitize_entry_path, sanitize_symlink_target};

pub mod entry;
mod error;
pub mod extract;
pub mod format;
pub mod locate;
pub mod options;
pub mod run;
mod sanitize;
