use std::collections::BTreeSet;
use std::path::PathBuf;

/// One archive member copied into the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub original_path: PathBuf,
    pub file_name: String,
    pub lines: usize,
}

#[derive(Clone, Debug, Default)]
pub struct NormalizeReport {
    /// Matched members in processing order, including ones later overwritten.
    pub entries: Vec<NormalizedEntry>,
    /// Members written to the scratch tree, matched or not.
    pub scratch_entries: usize,
    /// Base names written more than once; the last member processed won.
    pub collisions: Vec<String>,
}

impl NormalizeReport {
    /// Names present in the output directory.
    pub fn file_names(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.file_name.as_str()).collect()
    }
}
