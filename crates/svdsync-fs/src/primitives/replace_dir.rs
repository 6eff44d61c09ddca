use crate::{Error, Result};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct ReplaceDirOptions {
    pub retry_count: u32,
    pub retry_delay: Duration,
}

impl Default for ReplaceDirOptions {
    fn default() -> Self {
        Self {
            retry_count: 5,
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl ReplaceDirOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Remove a file, treating an absent file as success.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Delete `path` with everything under it and create it again empty.
pub fn recreate_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    remove_dir_if_exists(path)?;
    std::fs::create_dir_all(path).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Move `src` onto `dest`. Any existing `dest` is removed first, never merged.
pub fn replace_dir(src: impl AsRef<Path>, dest: impl AsRef<Path>, options: ReplaceDirOptions) -> Result<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    #[cfg(unix)]
    {
        let _ = options;
        remove_dir_if_exists(dest)?;
        std::fs::rename(src, dest).map_err(|e| Error::ReplaceDir {
            path: dest.to_path_buf(),
            source: e,
        })
    }

    // Antivirus and indexers hold handles briefly on Windows.
    #[cfg(windows)]
    {
        use std::thread;
        let mut attempts = 0;
        loop {
            if dest.exists()
                && let Err(e) = std::fs::remove_dir_all(dest)
            {
                attempts += 1;
                if attempts >= options.retry_count {
                    return Err(Error::ReplaceDir {
                        path: dest.to_path_buf(),
                        source: e,
                    });
                }
                thread::sleep(options.retry_delay * attempts);
                continue;
            }

            match std::fs::rename(src, dest) {
                Ok(_) => return Ok(()),
                Err(e) => {
                    attempts += 1;
                    if attempts >= options.retry_count {
                        return Err(Error::ReplaceDir {
                            path: dest.to_path_buf(),
                            source: e,
                        });
                    }
                    thread::sleep(options.retry_delay * attempts);
                }
            }
        }
    }
}
