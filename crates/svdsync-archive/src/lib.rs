//! Zip extraction and descriptor normalization.
//!
//! A staged archive is unpacked into a scratch tree, then every member whose
//! name ends with the configured suffix is normalized (see [`normalize_text`])
//! and written by base name into a family directory that replaces the previous
//! one wholesale.

mod error;
mod normalize;
mod options;
mod report;
mod sanitize;
mod source;

pub use error::{ArchiveError, Result};
pub use normalize::{decode_lenient, normalize_text};
pub use options::NormalizeOptions;
pub use report::{NormalizeReport, NormalizedEntry};
pub use sanitize::sanitize_path;
pub use source::{ScratchEntry, ZipSource};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use svdsync_fs::Workspace;
use tracing::{info, warn};

/// Normalize the descriptor files of `archive` into `destination`.
///
/// `scratch` is recreated and receives every member of the archive. The
/// destination directory ends up holding exactly the normalized descriptors of
/// this archive; whatever it held before is removed.
pub fn normalize_archive(
    archive: impl AsRef<Path>,
    scratch: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &NormalizeOptions,
) -> Result<NormalizeReport> {
    let archive = archive.as_ref();
    let scratch = scratch.as_ref();
    let destination = destination.as_ref();

    info!(archive = %archive.display(), "unzipping");

    let mut source = ZipSource::open(archive)?;
    svdsync_fs::recreate_dir(scratch)?;
    let extracted = source.extract_all(scratch)?;

    let workspace = Workspace::new(staging_path(destination), destination)?;
    let mut report = NormalizeReport {
        scratch_entries: extracted.len(),
        ..Default::default()
    };
    let mut written = HashSet::new();

    for entry in extracted.iter().filter(|e| options.matches(&e.name)) {
        let Some(file_name) = Path::new(&entry.name).file_name() else {
            continue;
        };
        let file_name = file_name.to_string_lossy().into_owned();

        let raw = svdsync_fs::atomic_read(&entry.path)?;
        let text = normalize_text(&decode_lenient(&raw));
        workspace.write(&file_name, text.as_bytes())?;

        if !written.insert(file_name.clone()) {
            warn!(file = %file_name, member = %entry.name, "duplicate base name, last member wins");
            report.collisions.push(file_name.clone());
        }

        report.entries.push(NormalizedEntry {
            original_path: PathBuf::from(&entry.name),
            file_name,
            lines: text.lines().count(),
        });
    }

    if report.entries.is_empty() {
        return Err(ArchiveError::NoDescriptors {
            archive: archive.to_path_buf(),
            suffix: options.suffix.clone(),
        });
    }

    workspace.commit()?;
    Ok(report)
}

/// Sibling of `destination`, so the final rename never crosses filesystems.
fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{name}.staging"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_sits_next_to_destination() {
        let staging = staging_path(Path::new("/repo/stm32f4"));
        assert_eq!(staging, Path::new("/repo/.stm32f4.staging"));
    }
}
