//! Error types for svdsync-fetch.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("file I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create temporary file: {0}")]
    TempFile(#[source] io::Error),

    #[error("destination directory does not exist: '{0}'")]
    MissingParent(PathBuf),

    #[error("destination path is a directory: '{0}'")]
    DestinationIsDirectory(PathBuf),

    #[error("failed to move download into '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Fs(#[from] svdsync_fs::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
