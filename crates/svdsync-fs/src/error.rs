use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove '{path}': {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to replace directory '{path}': {source}")]
    ReplaceDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("path has no parent directory: '{0}'")]
    NoParent(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
