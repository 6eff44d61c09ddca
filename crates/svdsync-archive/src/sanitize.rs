use std::path::{Component, Path, PathBuf};

use crate::error::{ArchiveError, Result};

/// Resolve an archive member name against `base`, rejecting names that would land outside it.
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(entry_path: P, base: B) -> Result<PathBuf> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();

    if entry_path.as_os_str().to_string_lossy().contains('\0') {
        return Err(ArchiveError::InvalidPath);
    }

    let mut relative = PathBuf::new();
    for component in entry_path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return Err(ArchiveError::ZipSlip {
                        entry: entry_path.to_path_buf(),
                        resolved: base.join(entry_path),
                    });
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::ZipSlip {
                    entry: entry_path.to_path_buf(),
                    resolved: entry_path.to_path_buf(),
                });
            }
        }
    }

    Ok(base.join(relative))
}
