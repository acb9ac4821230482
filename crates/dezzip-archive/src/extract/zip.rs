use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use crate::entry::{ArchiveReport, Entry, EntryKind};
use crate::error::{Error, Result};
use crate::format::ArchiveFormat;
use crate::options::ExtractOptions;
use crate::sanitize::{sanitize_entry_path, sanitize_symlink_target};

use super::{apply_unix_mode, ensure_dir, ensure_parent_dir, write_symlink};

pub struct ZipExtractor;

impl ZipExtractor {
    pub fn extract<R: Read + Seek>(
        &self,
        reader: R,
        destination: &Path,
        options: &ExtractOptions,
    ) -> Result<ArchiveReport> {
        let mut archive = zip::ZipArchive::new(reader).map_err(Error::corrupted)?;

        let mut entries = Vec::new();
        let mut files_written = 0usize;
        let mut total_bytes = 0u64;

        for index in 0..archive.len() {
            options.check_cancelled()?;

            let mut file = archive.by_index(index).map_err(Error::corrupted)?;
            let raw_path = PathBuf::from(file.name());
            let sanitized = sanitize_entry_path(&raw_path, destination)?;
            let size = file.size();
            let mode = file.unix_mode();

            let kind = if file.is_dir() {
                ensure_dir(&sanitized.resolved)?;
                EntryKind::Directory
            } else if is_symlink(mode) {
                // a symlink entry stores its target as the entry data
                let mut raw_target = Vec::new();
                file.read_to_end(&mut raw_target).map_err(Error::corrupted)?;
                let target =
                    PathBuf::from(String::from_utf8(raw_target).map_err(|_| Error::InvalidPath)?);
                let resolved_target =
                    sanitize_symlink_target(&target, &sanitized.resolved, destination)?;
                ensure_parent_dir(&sanitized.resolved)?;
                write_symlink(&resolved_target, &sanitized.resolved)?;
                EntryKind::Symlink { target }
            } else {
                ensure_parent_dir(&sanitized.resolved)?;
                let mut out =
                    File::create(&sanitized.resolved).map_err(|e| Error::ExtractionFailed {
                        path: sanitized.resolved.clone(),
                        source: e,
                    })?;
                io::copy(&mut file, &mut out).map_err(|e| Error::ExtractionFailed {
                    path: sanitized.resolved.clone(),
                    source: e,
                })?;
                apply_unix_mode(&sanitized.resolved, mode)?;
                files_written += 1;
                EntryKind::File
            };

            log::debug!(
                "extracted entry {} -> {}",
                sanitized.original.display(),
                sanitized.resolved.display()
            );
            total_bytes += size;
            entries.push(Entry {
                original_path: sanitized.original,
                target_path: sanitized.resolved,
                size,
                kind,
            });
        }

        Ok(ArchiveReport {
            format: ArchiveFormat::Zip,
            entry_count: entries.len(),
            files_written,
            total_bytes,
            entries,
        })
    }
}

/// Zip stores the Unix file type in the upper bits of the external
/// attributes; `S_IFLNK` marks a symlink entry.
fn is_symlink(mode: Option<u32>) -> bool {
    mode.is_some_and(|m| m & 0o170000 == 0o120000)
}
