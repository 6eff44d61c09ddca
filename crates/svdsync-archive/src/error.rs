use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("archive is corrupted: {reason}")]
    Corrupted { reason: String },

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("entry path contains null byte")]
    InvalidPath,

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("archive '{archive}' has no entries ending with '{suffix}'")]
    NoDescriptors { archive: PathBuf, suffix: String },

    #[error("workspace operation failed: {source}")]
    WorkspaceFailed { source: svdsync_fs::Error },
}

impl From<svdsync_fs::Error> for ArchiveError {
    fn from(e: svdsync_fs::Error) -> Self {
        Self::WorkspaceFailed { source: e }
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Corrupted { reason: e.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
