use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;

use thiserror::Error;
use tracing::info;

use crate::command::{Command, CommandError};

pub const DEFAULT_COMMIT_MESSAGE: &str = "Update STM32 SVD files";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was created.
    Recorded,
    /// The staged paths matched `HEAD`; no commit was created.
    Clean,
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("`{cmd}` exited with {status}: {stderr}")]
    Git {
        cmd: String,
        status: String,
        stderr: String,
    },
}

/// Stages the generated paths and commits them when the tree changed.
pub struct Committer {
    repo: PathBuf,
    message: String,
}

impl Committer {
    pub fn new(repo: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            message: message.into(),
        }
    }

    fn git<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Command::new("git")
            .current_dir(&self.repo)
            .env("GIT_TERMINAL_PROMPT", "0")
            .args(args)
    }

    fn run_checked(&self, command: Command) -> Result<Output, CommitError> {
        let cmd = command.display();
        let output = command.capture()?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(Self::failure(cmd, &output))
        }
    }

    fn failure(cmd: String, output: &Output) -> CommitError {
        CommitError::Git {
            cmd,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    fn has_head(&self) -> Result<bool, CommitError> {
        let verify = self.git(["rev-parse", "--verify", "--quiet", "HEAD"]);
        let cmd = verify.display();
        let output = verify.capture()?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Self::failure(cmd, &output)),
        }
    }

    /// Whether the index differs from `HEAD` under `paths`.
    ///
    /// Unstaged edits and paths outside `paths` are ignored. Without a `HEAD`
    /// anything staged under `paths` counts.
    fn staged_changes<P: AsRef<Path>>(&self, paths: &[P]) -> Result<bool, CommitError> {
        let diff = if self.has_head()? {
            self.git(["diff-index", "--cached", "--quiet", "HEAD", "--"])
        } else {
            self.git(["diff", "--cached", "--quiet", "--"])
        };
        let diff = diff.args(paths.iter().map(|p| p.as_ref().as_os_str()));
        let cmd = diff.display();
        let output = diff.capture()?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Self::failure(cmd, &output)),
        }
    }

    /// Stage `paths` and commit when that changed what `HEAD` records for them.
    pub fn commit<P: AsRef<Path>>(&self, paths: &[P]) -> Result<CommitOutcome, CommitError> {
        let add = self
            .git(["add", "--"])
            .args(paths.iter().map(|p| p.as_ref().as_os_str()));
        self.run_checked(add)?;

        if !self.staged_changes(paths)? {
            info!("nothing to commit");
            return Ok(CommitOutcome::Clean);
        }

        self.run_checked(self.git(["commit", "-q", "-m", self.message.as_str()]))?;
        info!(message = %self.message, "committed");
        Ok(CommitOutcome::Recorded)
    }
}
