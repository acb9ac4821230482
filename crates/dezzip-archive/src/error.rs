use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported archive format")]
    UnsupportedFormat,

    #[error("unsafe path: entry '{entry}' resolves outside '{base}'")]
    UnsafePath { entry: PathBuf, base: PathBuf },

    #[error("entry path is empty or contains invalid components")]
    InvalidPath,

    #[error("archive is corrupted: {detail}")]
    Corrupted { detail: String },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to create symlink '{link}': {source}")]
    SymlinkCreationFailed { link: PathBuf, source: io::Error },

    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn corrupted(detail: impl ToString) -> Self {
        Self::Corrupted {
            detail: detail.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
