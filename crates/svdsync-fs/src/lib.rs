//! Filesystem primitives used by the sync pipeline.
//!
//! - [`atomic_write`] - write-to-temp then rename
//! - [`replace_dir`] / [`recreate_dir`] - wholesale directory replacement
//! - [`Workspace`] - staging directory committed onto a destination, removed on drop

mod error;
mod primitives;
mod workspace;

pub use error::{Error, Result};
pub use primitives::{
    AtomicWriteOptions, ReplaceDirOptions, atomic_read, atomic_write, recreate_dir, remove_file_if_exists,
    replace_dir,
};
pub use workspace::Workspace;
