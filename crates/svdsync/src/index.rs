use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::bytes::{NoExpand, Regex};
use svdsync_fs::AtomicWriteOptions;
use thiserror::Error;
use tracing::info;

use crate::catalog::Family;

pub const START_MARKER: &str = "<!--families-->";
pub const END_MARKER: &str = "<!--/families-->";

static BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?s-u){}.*?{}",
        regex::escape(START_MARKER),
        regex::escape(END_MARKER)
    ))
    .unwrap()
});

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read index file: {0}")]
    Read(#[source] svdsync_fs::Error),

    #[error("no <!--families-->...<!--/families--> block in '{}'", .path.display())]
    MarkersNotFound { path: PathBuf },

    #[error("failed to write index file: {0}")]
    Write(#[source] svdsync_fs::Error),
}

/// The marker-delimited family list, one `- <Name>: v<Version>` line per family.
pub fn render_block(families: &[Family]) -> String {
    let lines = families
        .iter()
        .map(|f| format!("- {}: v{}", f.name, f.version))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{START_MARKER}\n{lines}\n{END_MARKER}")
}

/// Replace every marker block in `text`; `None` when there is none.
///
/// Bytes outside the blocks are kept exactly, valid UTF-8 or not.
pub fn replace_block(text: &[u8], families: &[Family]) -> Option<Vec<u8>> {
    if !BLOCK.is_match(text) {
        return None;
    }
    let block = render_block(families);
    Some(BLOCK.replace_all(text, NoExpand(block.as_bytes())).into_owned())
}

/// Rewrite the family block of the index file at `path`.
pub fn update_index(path: &Path, families: &[Family]) -> Result<(), IndexError> {
    let raw = svdsync_fs::atomic_read(path).map_err(IndexError::Read)?;

    let updated = replace_block(&raw, families).ok_or_else(|| IndexError::MarkersNotFound {
        path: path.to_path_buf(),
    })?;

    svdsync_fs::atomic_write(path, &updated, AtomicWriteOptions::new()).map_err(IndexError::Write)?;
    info!(path = %path.display(), families = families.len(), "index updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn families() -> Vec<Family> {
        vec![
            Family::new("Stm32f4", "1.2", "https://vendor.test/f4.zip"),
            Family::new("Stm32l0", "3.0", "https://vendor.test/l0.zip"),
        ]
    }

    #[test]
    fn block_is_replaced_and_surroundings_kept() {
        let text = b"# SVD\n\nIntro.\n<!--families-->OLD<!--/families-->\nFooter\n";
        let updated = replace_block(text, &families()).unwrap();
        assert_eq!(
            updated,
            b"# SVD\n\nIntro.\n<!--families-->\n- Stm32f4: v1.2\n- Stm32l0: v3.0\n<!--/families-->\nFooter\n"
        );
    }

    #[test]
    fn multi_line_block_is_replaced() {
        let text = b"a\n<!--families-->\n- STM32F0: v1.0\n- STM32F1: v1.1\n<!--/families-->\nb";
        let updated = replace_block(text, &families()[..1]).unwrap();
        assert_eq!(updated, b"a\n<!--families-->\n- Stm32f4: v1.2\n<!--/families-->\nb");
    }

    #[test]
    fn replacement_text_is_literal() {
        let odd = vec![Family::new("STM32$1", "${0}", "")];
        let updated = replace_block(b"<!--families--><!--/families-->", &odd).unwrap();
        assert_eq!(updated, b"<!--families-->\n- STM32$1: v${0}\n<!--/families-->");
    }

    #[test]
    fn missing_markers_yield_none() {
        assert!(replace_block(b"no block here", &families()).is_none());
        assert!(replace_block(b"<!--families--> unterminated", &families()).is_none());
    }

    #[test]
    fn invalid_utf8_inside_block_is_replaced() {
        let updated = replace_block(b"<!--families-->\xff\xfe<!--/families-->", &families()[..1]).unwrap();
        assert_eq!(updated, b"<!--families-->\n- Stm32f4: v1.2\n<!--/families-->");
    }

    #[test]
    fn empty_catalog_renders_empty_block() {
        assert_eq!(render_block(&[]), "<!--families-->\n\n<!--/families-->");
    }

    #[test]
    fn update_index_reports_missing_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, "plain readme\n").unwrap();

        let result = update_index(&path, &families());
        assert!(matches!(result, Err(IndexError::MarkersNotFound { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "plain readme\n");
    }

    #[test]
    fn update_index_keeps_non_utf8_bytes_outside_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, b"Caf\xe9 notes\n<!--families-->\n<!--/families-->\n\x80 end\n").unwrap();

        update_index(&path, &families()[..1]).unwrap();

        assert_eq!(
            std::fs::read(&path).unwrap(),
            b"Caf\xe9 notes\n<!--families-->\n- Stm32f4: v1.2\n<!--/families-->\n\x80 end\n"
        );
    }

    #[test]
    fn update_index_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = update_index(&dir.path().join("README.md"), &families());
        assert!(matches!(result, Err(IndexError::Read(_))));
    }
}
