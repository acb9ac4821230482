use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::entry::{ArchiveReport, Entry, EntryKind};
use crate::error::{Error, Result};
use crate::format::{ArchiveFormat, TarCompress};
use crate::options::ExtractOptions;
use crate::sanitize::{sanitize_entry_path, sanitize_symlink_target};

use super::{apply_unix_mode, ensure_dir, ensure_parent_dir, write_symlink};

pub struct TarExtractor {
    codec: TarCompress,
}

impl TarExtractor {
    pub fn new(codec: TarCompress) -> Self {
        Self { codec }
    }

    pub fn extract<R: Read>(
        &self,
        reader: R,
        destination: &Path,
        options: &ExtractOptions,
    ) -> Result<ArchiveReport> {
        let decoder = self.codec.decoder(reader);
        let mut archive = tar::Archive::new(decoder);

        let mut entries = Vec::new();
        let mut files_written = 0usize;
        let mut total_bytes = 0u64;

        for entry in archive.entries().map_err(Error::corrupted)? {
            options.check_cancelled()?;

            let mut entry = entry.map_err(Error::corrupted)?;
            let raw_path = entry.path().map_err(Error::corrupted)?.into_owned();
            let sanitized = sanitize_entry_path(&raw_path, destination)?;

            let header = entry.header();
            let size = header.size().unwrap_or(0);
            let entry_type = header.entry_type();
            let mode = header.mode().ok();

            let kind = if entry_type.is_dir() {
                ensure_dir(&sanitized.resolved)?;
                EntryKind::Directory
            } else if entry_type.is_symlink() {
                let target = entry
                    .link_name()
                    .map_err(Error::corrupted)?
                    .ok_or(Error::InvalidPath)?
                    .into_owned();
                let resolved_target =
                    sanitize_symlink_target(&target, &sanitized.resolved, destination)?;
                ensure_parent_dir(&sanitized.resolved)?;
                write_symlink(&resolved_target, &sanitized.resolved)?;
                EntryKind::Symlink { target }
            } else if entry_type.is_file() {
                ensure_parent_dir(&sanitized.resolved)?;
                let mut out =
                    File::create(&sanitized.resolved).map_err(|e| Error::ExtractionFailed {
                        path: sanitized.resolved.clone(),
                        source: e,
                    })?;
                io::copy(&mut entry, &mut out).map_err(|e| Error::ExtractionFailed {
                    path: sanitized.resolved.clone(),
                    source: e,
                })?;
                apply_unix_mode(&sanitized.resolved, mode)?;
                files_written += 1;
                EntryKind::File
            } else {
                // hardlinks, fifos and friends are not reproduced
                log::debug!(
                    "skipping special entry {} ({:?})",
                    raw_path.display(),
                    entry_type
                );
                continue;
            };

            total_bytes += size;
            entries.push(Entry {
                original_path: sanitized.original,
                target_path: sanitized.resolved,
                size,
                kind,
            });
        }

        Ok(ArchiveReport {
            format: ArchiveFormat::Tar(self.codec),
            entry_count: entries.len(),
            files_written,
            total_bytes,
            entries,
        })
    }
}
