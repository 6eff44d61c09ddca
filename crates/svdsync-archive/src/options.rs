/// Settings for [`crate::normalize_archive`].
#[derive(Clone, Debug)]
pub struct NormalizeOptions {
    pub suffix: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            suffix: ".svd".to_string(),
        }
    }
}

impl NormalizeOptions {
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn matches(&self, member_name: &str) -> bool {
        member_name.ends_with(&self.suffix)
    }
}
