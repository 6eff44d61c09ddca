use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ArchiveError, Result};
use crate::sanitize::sanitize_path;

/// A file member written to the scratch tree.
#[derive(Clone, Debug)]
pub struct ScratchEntry {
    /// Member name exactly as stored in the archive.
    pub name: String,
    pub path: PathBuf,
}

pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl ZipSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ArchiveError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Extract every member under `scratch`, in archive order.
    ///
    /// Directory members are created; file members are returned.
    pub fn extract_all(&mut self, scratch: &Path) -> Result<Vec<ScratchEntry>> {
        let mut extracted = Vec::new();

        for index in 0..self.archive.len() {
            let mut member = self.archive.by_index(index)?;
            let name = member.name().to_string();
            let target = sanitize_path(&name, scratch)?;

            if member.is_dir() {
                fs::create_dir_all(&target).map_err(|e| ArchiveError::ExtractionFailed {
                    path: target.clone(),
                    source: e,
                })?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ArchiveError::ExtractionFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            let mut out = File::create(&target).map_err(|e| ArchiveError::ExtractionFailed {
                path: target.clone(),
                source: e,
            })?;
            io::copy(&mut member, &mut out).map_err(|e| ArchiveError::ExtractionFailed {
                path: target.clone(),
                source: e,
            })?;

            debug!(member = %name, "extracted");
            extracted.push(ScratchEntry { name, path: target });
        }

        Ok(extracted)
    }
}
