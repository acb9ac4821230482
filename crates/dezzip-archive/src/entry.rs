use std::path::{Path, PathBuf};

use crate::format::ArchiveFormat;

/// A single record extracted from an archive.
#[derive(Clone, Debug)]
pub struct Entry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub kind: EntryKind,
}

#[derive(Clone, Debug)]
pub enum EntryKind {
    File,
    Directory,
    Symlink { target: PathBuf },
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    pub fn symlink_target(&self) -> Option<&Path> {
        match &self.kind {
            EntryKind::Symlink { target } => Some(target),
            _ => None,
        }
    }
}

/// What one archive extraction produced.
#[derive(Clone, Debug)]
pub struct ArchiveReport {
    pub format: ArchiveFormat,
    pub entry_count: usize,
    pub files_written: usize,
    pub total_bytes: u64,
    pub entries: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_predicates() {
        let file = Entry {
            original_path: PathBuf::from("a.txt"),
            target_path: PathBuf::from("/out/a.txt"),
            size: 12,
            kind: EntryKind::File,
        };
        assert!(file.is_file());
        assert!(!file.is_directory());
        assert!(file.symlink_target().is_none());

        let link = Entry {
            original_path: PathBuf::from("link"),
            target_path: PathBuf::from("/out/link"),
            size: 0,
            kind: EntryKind::Symlink {
                target: PathBuf::from("a.txt"),
            },
        };
        assert_eq!(link.symlink_target(), Some(Path::new("a.txt")));
    }

    #[test]
    fn report_fields() {
        let report = ArchiveReport {
            format: ArchiveFormat::Zip,
            entry_count: 3,
            files_written: 2,
            total_bytes: 128,
            entries: Vec::new(),
        };
        assert_eq!(report.format, ArchiveFormat::Zip);
        assert_eq!(report.entry_count, 3);
        assert_eq!(report.files_written, 2);
        assert_eq!(report.total_bytes, 128);
    }
}
