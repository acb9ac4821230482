use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::format::ArchiveFormat;

/// One item produced by the walk: either a candidate archive or a
/// directory the walker was unable to read.
#[derive(Clone, Debug)]
pub enum Located {
    Archive(PathBuf),
    Denied { path: PathBuf, message: String },
}

/// Walks a root directory and yields every file whose name matches a
/// recognized archive format.
///
/// The walk is lazy and restartable (`iter` can be called again for a fresh
/// pass), deterministic on an unchanged tree (entries sorted by file name),
/// and never follows symlinks, so directory cycles cannot occur. Unreadable
/// directories are yielded as [`Located::Denied`] instead of aborting.
pub struct ArchiveLocator {
    root: PathBuf,
}

impl ArchiveLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn iter(&self) -> impl Iterator<Item = Located> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => {
                    if entry.file_type().is_file()
                        && ArchiveFormat::from_path(entry.path()).is_some()
                    {
                        log::debug!("located archive {}", entry.path().display());
                        Some(Located::Archive(entry.into_path()))
                    } else {
                        None
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    log::warn!("cannot read {}: {err}", path.display());
                    Some(Located::Denied {
                        path,
                        message: err.to_string(),
                    })
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn finds_archives_and_ignores_the_rest() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        touch(&root.join("top.zip"));
        touch(&root.join("a/nested.tar.gz"));
        touch(&root.join("a/b/deep.tgz"));
        touch(&root.join("a/readme.txt"));
        touch(&root.join("a/b/data.bin"));

        let archives: Vec<_> = ArchiveLocator::new(root)
            .iter()
            .filter_map(|item| match item {
                Located::Archive(path) => Some(path),
                Located::Denied { .. } => None,
            })
            .collect();

        assert_eq!(archives.len(), 3);
        assert!(archives.iter().all(|p| p.exists()));
    }

    #[test]
    fn walk_order_is_deterministic() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("z")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        touch(&root.join("z/one.zip"));
        touch(&root.join("a/two.zip"));
        touch(&root.join("three.zip"));

        let pass = || -> Vec<PathBuf> {
            ArchiveLocator::new(root)
                .iter()
                .filter_map(|item| match item {
                    Located::Archive(path) => Some(path),
                    Located::Denied { .. } => None,
                })
                .collect()
        };

        assert_eq!(pass(), pass());
    }

    #[test]
    fn a_directory_named_like_an_archive_is_not_located() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("fake.zip")).unwrap();
        touch(&root.join("real.zip"));

        let archives: Vec<_> = ArchiveLocator::new(root)
            .iter()
            .filter_map(|item| match item {
                Located::Archive(path) => Some(path),
                Located::Denied { .. } => None,
            })
            .collect();

        assert_eq!(archives, vec![root.join("real.zip")]);
    }
}
