//! Per-format archive extraction.
//!
//! Entry paths are sanitized before anything touches the filesystem; an
//! unsafe entry aborts the whole archive. On Unix the mode bits recorded in
//! the archive are applied to extracted files, elsewhere they are ignored.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::entry::ArchiveReport;
use crate::error::{Error, Result};
use crate::format::ArchiveFormat;
use crate::options::ExtractOptions;

mod tar;
mod zip;

pub use self::tar::TarExtractor;
pub use self::zip::ZipExtractor;

pub enum ArchiveExtractor {
    Zip(ZipExtractor),
    Tar(TarExtractor),
}

pub fn extractor_for(format: ArchiveFormat) -> ArchiveExtractor {
    match format {
        ArchiveFormat::Zip => ArchiveExtractor::Zip(ZipExtractor),
        ArchiveFormat::Tar(codec) => ArchiveExtractor::Tar(TarExtractor::new(codec)),
    }
}

impl ArchiveExtractor {
    pub fn extract<R: Read + Seek>(
        &self,
        reader: R,
        destination: &Path,
        options: &ExtractOptions,
    ) -> Result<ArchiveReport> {
        match self {
            ArchiveExtractor::Zip(extractor) => extractor.extract(reader, destination, options),
            ArchiveExtractor::Tar(extractor) => extractor.extract(reader, destination, options),
        }
    }
}

/// Open an archive file and extract it into `destination`.
///
/// The format is taken from the file name; the destination directory must
/// already exist.
pub fn extract_path(
    archive: &Path,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let format = ArchiveFormat::from_path(archive).ok_or(Error::UnsupportedFormat)?;
    let file = File::open(archive)?;
    extractor_for(format).extract(BufReader::new(file), destination, options)
}

fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            ensure_dir(parent)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn apply_unix_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_unix_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::SymlinkCreationFailed {
        link: link.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    // No portable symlink creation off Unix; record the intent and move on.
    log::warn!(
        "skipping symlink {} -> {} (unsupported on this platform)",
        link.display(),
        target.display()
    );
    Ok(())
}
