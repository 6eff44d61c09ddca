use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A staging directory that becomes `destination` on [`Workspace::commit`].
///
/// Dropping an uncommitted workspace removes the staging directory.
pub struct Workspace {
    staging_path: PathBuf,
    destination_path: PathBuf,
    committed: bool,
}

impl Workspace {
    pub fn new(staging_dir: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<Self> {
        let staging_path = staging_dir.as_ref().to_path_buf();
        let destination_path = destination.as_ref().to_path_buf();

        crate::recreate_dir(&staging_path)?;

        Ok(Self {
            staging_path,
            destination_path,
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.staging_path
    }

    /// Write `content` to `name` inside the staging directory, overwriting any previous file.
    pub fn write(&self, name: impl AsRef<Path>, content: &[u8]) -> Result<()> {
        let full_path = self.staging_path.join(name);
        std::fs::write(&full_path, content).map_err(|e| Error::Write {
            path: full_path,
            source: e,
        })
    }

    pub fn commit(mut self) -> Result<()> {
        crate::replace_dir(&self.staging_path, &self.destination_path, Default::default())?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_dir_all(&self.staging_path);
        }
    }
}
