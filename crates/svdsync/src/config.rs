use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use svdsync_archive::NormalizeOptions;
use svdsync_fetch::FetchOptions;

use crate::catalog::{DEFAULT_CATALOG_URL, DEFAULT_ORIGIN, Family};
use crate::commit::DEFAULT_COMMIT_MESSAGE;

/// Run configuration.
///
/// Layered as: built-in defaults, then `svdsync.toml` in the repository root,
/// then `SVDSYNC_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_url: String,
    /// Prefix turning the catalog's relative links into absolute URLs.
    pub origin: String,
    pub headers: BTreeMap<String, String>,
    pub raw_dir: PathBuf,
    pub readme: PathBuf,
    pub suffix: String,
    pub commit_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            headers: svdsync_fetch::browser_headers().into_iter().collect(),
            raw_dir: PathBuf::from("raw"),
            readme: PathBuf::from("README.md"),
            suffix: ".svd".to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "svdsync.toml";
    pub const ENV_PREFIX: &'static str = "SVDSYNC_";

    pub fn figment(root: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(root.join(Self::FILE_NAME)))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    pub fn load(root: &Path) -> Result<Self, figment::Error> {
        Self::figment(root).extract()
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::with_headers(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::default().suffix(self.suffix.clone())
    }
}

/// Every path a run touches, derived from the repository root.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    raw_dir: PathBuf,
    readme: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        let root = root.into();
        Self {
            raw_dir: root.join(&config.raw_dir),
            readme: root.join(&config.readme),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn readme(&self) -> &Path {
        &self.readme
    }

    /// `raw/<family>.zip`
    pub fn staged_archive(&self, family: &Family) -> PathBuf {
        self.raw_dir.join(format!("{}.zip", family.dir_name()))
    }

    /// `raw/<family>/`
    pub fn scratch_dir(&self, family: &Family) -> PathBuf {
        self.raw_dir.join(family.dir_name())
    }

    /// `<family>/`
    pub fn family_dir(&self, family: &Family) -> PathBuf {
        self.root.join(family.dir_name())
    }
}
