use std::path::PathBuf;

use svdsync_archive::ArchiveError;
use svdsync_fetch::FetchError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::commit::CommitError;
use crate::index::IndexError;

/// Every way a run can stop. None of them is retried.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to resolve catalog {url}: {source}")]
    CatalogFetch {
        url: String,
        #[source]
        source: CatalogError,
    },

    #[error("failed to stage archive of {family}: {source}")]
    ArchiveFetch {
        family: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to normalize archive of {family}: {source}")]
    ArchiveFormat {
        family: String,
        #[source]
        source: ArchiveError,
    },

    #[error("failed to update index: {0}")]
    IndexUpdate(#[from] IndexError),

    #[error("failed to commit: {0}")]
    Commit(#[from] CommitError),

    #[error("failed to prepare staging directory '{}': {source}", .path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: svdsync_fs::Error,
    },
}
