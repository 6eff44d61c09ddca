//! Mirror vendor SVD archives into a normalized, version-controlled layout.
//!
//! A run resolves the remote catalog, optionally stages every family's
//! archive under `raw/`, rewrites each family directory from its archive,
//! refreshes the family list in `README.md` and optionally commits.

pub mod catalog;
pub mod command;
pub mod commit;
pub mod config;
pub mod error;
pub mod index;
pub mod sync;

pub use catalog::{CatalogError, Family, parse_catalog};
pub use commit::{CommitError, CommitOutcome, Committer};
pub use config::{Config, Layout};
pub use error::SyncError;
pub use index::{IndexError, render_block, replace_block, update_index};
pub use sync::{RunOptions, RunReport, Stage, Syncer};
