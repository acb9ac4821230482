//! Extraction orchestration: consumes located archives one at a time,
//! derives targets, applies the collision policy and records one outcome
//! per archive. A bad archive never aborts the run; only a user interrupt
//! halts further processing.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Error;
use crate::extract::extract_path;
use crate::format::archive_stem;
use crate::locate::{ArchiveLocator, Located};
use crate::options::ExtractOptions;

#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Root directory to scan.
    pub root: PathBuf,
    /// Extract everything under this directory instead of beside each
    /// archive, preserving each archive's sub-path from `root`.
    pub destination_root: Option<PathBuf>,
    /// Extract into existing target directories instead of skipping them.
    pub overwrite: bool,
    /// Maximum discovery passes; passes beyond the first pick up archives
    /// that earlier extractions surfaced.
    pub max_passes: usize,
    /// Cooperative interrupt flag, polled between archives and entries.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RunConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            destination_root: None,
            overwrite: false,
            max_passes: 1,
            cancel: None,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn destination_root(mut self, dest: impl Into<PathBuf>) -> Self {
        self.destination_root = Some(dest.into());
        self
    }

    pub fn max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    TargetExists,
    AccessDenied,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetExists => write!(f, "target exists"),
            Self::AccessDenied => write!(f, "permission denied"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    CorruptArchive,
    UnsafePath,
    Interrupted,
    AccessDenied,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CorruptArchive => write!(f, "corrupt archive"),
            Self::UnsafePath => write!(f, "unsafe path"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::AccessDenied => write!(f, "access denied"),
            Self::Io => write!(f, "i/o error"),
        }
    }
}

impl From<&Error> for FailureKind {
    fn from(error: &Error) -> Self {
        match error {
            Error::Corrupted { .. } | Error::UnsupportedFormat => Self::CorruptArchive,
            Error::UnsafePath { .. } | Error::InvalidPath => Self::UnsafePath,
            Error::Interrupted => Self::Interrupted,
            Error::Io(e) => kind_for_io(e),
            Error::ExtractionFailed { source, .. }
            | Error::DirectoryCreationFailed { source, .. }
            | Error::SymlinkCreationFailed { source, .. } => kind_for_io(source),
        }
    }
}

fn kind_for_io(error: &io::Error) -> FailureKind {
    if error.kind() == io::ErrorKind::PermissionDenied {
        FailureKind::AccessDenied
    } else {
        FailureKind::Io
    }
}

/// Terminal state of one archive. Produced exactly once per discovered
/// archive, never mutated.
#[derive(Clone, Debug)]
pub enum Outcome {
    Extracted { target: PathBuf, files_written: usize },
    Skipped { reason: SkipReason },
    Failed { kind: FailureKind, message: String },
}

#[derive(Clone, Debug)]
pub struct ArchiveOutcome {
    pub path: PathBuf,
    pub outcome: Outcome,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Extracted { .. } => self.extracted += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    /// True when no archive failed; maps to process exit status 0.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} extracted, {} skipped, {} failed",
            self.extracted, self.skipped, self.failed
        )
    }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub outcomes: Vec<ArchiveOutcome>,
    pub summary: RunSummary,
    pub interrupted: bool,
}

/// Run the full discover-and-extract pipeline.
///
/// `observer` is invoked once per recorded outcome, in processing order, so
/// a caller can report progress while the run is still going.
pub fn run(config: &RunConfig, mut observer: impl FnMut(&ArchiveOutcome)) -> RunReport {
    let mut processed: HashSet<PathBuf> = HashSet::new();
    let mut outcomes = Vec::new();
    let mut summary = RunSummary::default();
    let mut interrupted = false;

    'passes: for pass in 0..config.max_passes.max(1) {
        let mut extracted_this_pass = false;

        for scan_root in scan_roots(config, pass) {
            log::debug!("discovery pass {} over {}", pass + 1, scan_root.display());
            let locator = ArchiveLocator::new(&scan_root);

            for located in locator.iter() {
                if config.is_cancelled() {
                    interrupted = true;
                    break 'passes;
                }

                let record = match located {
                    Located::Denied { path, message } => {
                        if !processed.insert(path.clone()) {
                            continue;
                        }
                        log::warn!("skipping unreadable directory {}: {message}", path.display());
                        ArchiveOutcome {
                            path,
                            outcome: Outcome::Skipped {
                                reason: SkipReason::AccessDenied,
                            },
                        }
                    }
                    Located::Archive(path) => {
                        if !processed.insert(path.clone()) {
                            continue;
                        }
                        let outcome = process_archive(config, &path);
                        if matches!(outcome, Outcome::Extracted { .. }) {
                            extracted_this_pass = true;
                        }
                        ArchiveOutcome { path, outcome }
                    }
                };

                let halt = matches!(
                    record.outcome,
                    Outcome::Failed {
                        kind: FailureKind::Interrupted,
                        ..
                    }
                );
                summary.record(&record.outcome);
                observer(&record);
                outcomes.push(record);
                if halt {
                    interrupted = true;
                    break 'passes;
                }
            }
        }

        // Nothing new extracted means nothing new to discover.
        if !extracted_this_pass {
            break;
        }
    }

    RunReport {
        outcomes,
        summary,
        interrupted,
    }
}

/// Directories to walk on one pass. The first pass covers only the scanned
/// root; later passes also cover a separate destination root, where earlier
/// extractions may have surfaced nested archives.
fn scan_roots(config: &RunConfig, pass: usize) -> Vec<PathBuf> {
    let mut roots = vec![config.root.clone()];
    if pass > 0 {
        if let Some(dest) = &config.destination_root {
            if dest.is_dir() && !dest.starts_with(&config.root) {
                roots.push(dest.clone());
            }
        }
    }
    roots
}

fn process_archive(config: &RunConfig, archive: &Path) -> Outcome {
    let Some(target) = derive_target(config, archive) else {
        return Outcome::Failed {
            kind: FailureKind::Io,
            message: format!(
                "cannot derive a target directory name for '{}'",
                archive.display()
            ),
        };
    };

    if target.exists() && !config.overwrite {
        return Outcome::Skipped {
            reason: SkipReason::TargetExists,
        };
    }

    if let Err(e) = fs::create_dir_all(&target) {
        return Outcome::Failed {
            kind: kind_for_io(&e),
            message: format!("failed to create '{}': {e}", target.display()),
        };
    }

    let mut options = ExtractOptions::default();
    if let Some(flag) = &config.cancel {
        options = options.cancel_flag(Arc::clone(flag));
    }

    match extract_path(archive, &target, &options) {
        Ok(report) => {
            log::debug!(
                "extracted {} ({} entries, {} bytes)",
                archive.display(),
                report.entry_count,
                report.total_bytes
            );
            Outcome::Extracted {
                target,
                files_written: report.files_written,
            }
        }
        Err(e) => Outcome::Failed {
            kind: FailureKind::from(&e),
            message: e.to_string(),
        },
    }
}

/// Target directory for one archive.
///
/// Default is a sibling directory named after the archive's stem. With a
/// destination root, the archive's sub-path from the scanned root is
/// preserved underneath it so same-named archives in different directories
/// cannot collide.
fn derive_target(config: &RunConfig, archive: &Path) -> Option<PathBuf> {
    let stem = archive_stem(archive)?;
    let parent = archive.parent().unwrap_or_else(|| Path::new(""));
    match &config.destination_root {
        None => Some(parent.join(stem)),
        Some(dest) => {
            // an archive surfaced inside the destination tree keeps its
            // sub-path from there instead
            let relative = parent
                .strip_prefix(&config.root)
                .or_else(|_| parent.strip_prefix(dest))
                .unwrap_or(Path::new(""));
            Some(dest.join(relative).join(stem))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_records_each_outcome_once() {
        let mut summary = RunSummary::default();
        summary.record(&Outcome::Extracted {
            target: PathBuf::from("/out/a"),
            files_written: 2,
        });
        summary.record(&Outcome::Skipped {
            reason: SkipReason::TargetExists,
        });
        summary.record(&Outcome::Failed {
            kind: FailureKind::CorruptArchive,
            message: "bad".into(),
        });
        assert_eq!(summary.extracted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_clean());
    }

    #[test]
    fn summary_display() {
        let summary = RunSummary {
            extracted: 2,
            skipped: 1,
            failed: 0,
        };
        assert_eq!(summary.to_string(), "2 extracted, 1 skipped, 0 failed");
        assert!(summary.is_clean());
    }

    #[test]
    fn failure_kind_mapping() {
        assert_eq!(
            FailureKind::from(&Error::Corrupted {
                detail: "bad".into()
            }),
            FailureKind::CorruptArchive
        );
        assert_eq!(
            FailureKind::from(&Error::UnsafePath {
                entry: PathBuf::from("../x"),
                base: PathBuf::from("/out"),
            }),
            FailureKind::UnsafePath
        );
        assert_eq!(
            FailureKind::from(&Error::Interrupted),
            FailureKind::Interrupted
        );
        assert_eq!(
            FailureKind::from(&Error::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "nope"
            ))),
            FailureKind::AccessDenied
        );
        assert_eq!(
            FailureKind::from(&Error::Io(io::Error::other("boom"))),
            FailureKind::Io
        );
    }

    #[test]
    fn default_target_is_a_sibling_directory() {
        let config = RunConfig::new("/scan");
        let target = derive_target(&config, Path::new("/scan/sub/photos.zip")).unwrap();
        assert_eq!(target, PathBuf::from("/scan/sub/photos"));
    }

    #[test]
    fn destination_root_preserves_sub_path() {
        let config = RunConfig::new("/scan").destination_root("/out");
        let target = derive_target(&config, Path::new("/scan/a/b/photos.zip")).unwrap();
        assert_eq!(target, PathBuf::from("/out/a/b/photos"));
    }

    #[test]
    fn destination_root_keeps_same_named_archives_apart() {
        let config = RunConfig::new("/scan").destination_root("/out");
        let first = derive_target(&config, Path::new("/scan/a/data.zip")).unwrap();
        let second = derive_target(&config, Path::new("/scan/b/data.zip")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn archive_inside_destination_keeps_its_sub_path() {
        let config = RunConfig::new("/scan").destination_root("/out");
        let target = derive_target(&config, Path::new("/out/a/b/photos.zip")).unwrap();
        assert_eq!(target, PathBuf::from("/out/a/b/photos"));
    }

    #[test]
    fn first_pass_scans_only_the_root() {
        let temp = tempfile::tempdir().unwrap();
        let config = RunConfig::new("/scan").destination_root(temp.path());
        assert_eq!(scan_roots(&config, 0), vec![PathBuf::from("/scan")]);
        assert_eq!(
            scan_roots(&config, 1),
            vec![PathBuf::from("/scan"), temp.path().to_path_buf()]
        );
    }

    #[test]
    fn destination_under_root_is_not_scanned_twice() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("out");
        std::fs::create_dir(&dest).unwrap();
        let config = RunConfig::new(temp.path()).destination_root(&dest);
        assert_eq!(scan_roots(&config, 1), vec![temp.path().to_path_buf()]);
    }

    #[test]
    fn double_extension_stripped_from_target() {
        let config = RunConfig::new("/scan");
        let target = derive_target(&config, Path::new("/scan/backup.tar.gz")).unwrap();
        assert_eq!(target, PathBuf::from("/scan/backup"));
    }

    #[test]
    fn bare_extension_has_no_target() {
        let config = RunConfig::new("/scan");
        assert!(derive_target(&config, Path::new("/scan/.zip")).is_none());
    }
}
