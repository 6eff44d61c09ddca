use std::fmt;
use std::path::{Path, PathBuf};

use svdsync_archive::NormalizeReport;
use svdsync_fetch::{Fetcher, HttpClient};
use tracing::{debug, info};

use crate::catalog::{self, Family};
use crate::commit::{CommitOutcome, Committer};
use crate::config::{Config, Layout};
use crate::error::SyncError;
use crate::index;

/// Which optional phases a run performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Download fresh archives; otherwise reuse what is staged under `raw/`.
    pub download: bool,
    /// Commit the result.
    pub commit: bool,
}

/// Progress of a run. Every transition is sequential; a failure ends the run in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    CatalogResolved,
    Fetched,
    Normalized,
    IndexUpdated,
    Committed,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Start => write!(f, "Start"),
            Stage::CatalogResolved => write!(f, "CatalogResolved"),
            Stage::Fetched => write!(f, "Fetched"),
            Stage::Normalized => write!(f, "Normalized"),
            Stage::IndexUpdated => write!(f, "IndexUpdated"),
            Stage::Committed => write!(f, "Committed"),
            Stage::Done => write!(f, "Done"),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub families: Vec<Family>,
    /// Per family directory name, in processing order.
    pub normalized: Vec<(String, NormalizeReport)>,
    pub commit: Option<CommitOutcome>,
    /// Stages passed through, `Start` first and `Done` last.
    pub stages: Vec<Stage>,
}

pub struct Syncer<C: HttpClient> {
    fetcher: Fetcher<C>,
    config: Config,
    layout: Layout,
}

impl<C: HttpClient> Syncer<C> {
    pub fn new(client: C, config: Config, root: impl Into<PathBuf>) -> Self {
        let fetcher = Fetcher::new(client).with_options(config.fetch_options());
        let layout = Layout::new(root, &config);
        Self {
            fetcher,
            config,
            layout,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn resolve(&self) -> Result<Vec<Family>, SyncError> {
        catalog::resolve(&self.fetcher, &self.config.catalog_url, &self.config.origin)
            .await
            .map_err(|source| SyncError::CatalogFetch {
                url: self.config.catalog_url.clone(),
                source,
            })
    }

    /// Recreate the staging directory and download every family's archive into it.
    pub async fn fetch_all(&self, families: &[Family]) -> Result<(), SyncError> {
        let raw_dir = self.layout.raw_dir();
        svdsync_fs::recreate_dir(raw_dir).map_err(|source| SyncError::Staging {
            path: raw_dir.to_path_buf(),
            source,
        })?;

        for family in families {
            let destination = self.layout.staged_archive(family);
            let bytes = self
                .fetcher
                .fetch(&family.source, &destination)
                .await
                .map_err(|source| SyncError::ArchiveFetch {
                    family: family.name.clone(),
                    source,
                })?;
            debug!(family = %family.name, bytes, "archive staged");
        }
        Ok(())
    }

    /// Rebuild each family directory from its staged archive.
    pub fn normalize_all(&self, families: &[Family]) -> Result<Vec<(String, NormalizeReport)>, SyncError> {
        let options = self.config.normalize_options();
        families
            .iter()
            .map(|family| -> Result<(String, NormalizeReport), SyncError> {
                let report = svdsync_archive::normalize_archive(
                    self.layout.staged_archive(family),
                    self.layout.scratch_dir(family),
                    self.layout.family_dir(family),
                    &options,
                )
                .map_err(|source| SyncError::ArchiveFormat {
                    family: family.name.clone(),
                    source,
                })?;
                info!(
                    family = %family.name,
                    files = report.file_names().len(),
                    collisions = report.collisions.len(),
                    "normalized"
                );
                Ok((family.dir_name(), report))
            })
            .collect()
    }

    pub fn update_index(&self, families: &[Family]) -> Result<(), SyncError> {
        index::update_index(self.layout.readme(), families)?;
        Ok(())
    }

    /// Stage the index file and every family directory, committing only when something changed.
    pub fn commit(&self, families: &[Family]) -> Result<CommitOutcome, SyncError> {
        let mut paths: Vec<PathBuf> = vec![relative_to(self.layout.readme(), self.layout.root())];
        paths.extend(families.iter().map(|f| PathBuf::from(f.dir_name())));

        let committer = Committer::new(self.layout.root(), self.config.commit_message.clone());
        Ok(committer.commit(&paths)?)
    }

    pub async fn run(&self, options: RunOptions) -> Result<RunReport, SyncError> {
        let mut stages = vec![Stage::Start];
        let mut advance = |stage: Stage| {
            info!(%stage, "stage reached");
            stages.push(stage);
        };

        let families = self.resolve().await?;
        advance(Stage::CatalogResolved);

        if options.download {
            self.fetch_all(&families).await?;
            advance(Stage::Fetched);
        }

        let normalized = self.normalize_all(&families)?;
        advance(Stage::Normalized);

        self.update_index(&families)?;
        advance(Stage::IndexUpdated);

        let commit = if options.commit {
            let outcome = self.commit(&families)?;
            advance(Stage::Committed);
            Some(outcome)
        } else {
            None
        };
        advance(Stage::Done);

        Ok(RunReport {
            families,
            normalized,
            commit,
            stages,
        })
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_to_strips_root() {
        assert_eq!(
            relative_to(Path::new("/repo/README.md"), Path::new("/repo")),
            Path::new("README.md")
        );
        assert_eq!(
            relative_to(Path::new("/elsewhere/INDEX.md"), Path::new("/repo")),
            Path::new("/elsewhere/INDEX.md")
        );
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::CatalogResolved.to_string(), "CatalogResolved");
        assert_eq!(Stage::Done.to_string(), "Done");
    }
}
