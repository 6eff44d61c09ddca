pub mod atomic_write;
pub mod replace_dir;

pub use atomic_write::{AtomicWriteOptions, atomic_read, atomic_write};
pub use replace_dir::{ReplaceDirOptions, recreate_dir, remove_file_if_exists, replace_dir};
