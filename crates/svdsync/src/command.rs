use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command as StdCommand, Output};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command failed: {cmd}, source: {source}")]
    CommandFailed { cmd: String, source: std::io::Error },
}

/// Thin builder over [`std::process::Command`] that remembers what it runs.
#[derive(Debug)]
pub struct Command {
    inner: StdCommand,
    program: String,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            inner: StdCommand::new(&program),
            program,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.inner.current_dir(dir);
        self
    }

    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.inner.env(key, val);
        self
    }

    /// Program and arguments, for messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.inner.get_args().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion, capturing stdout and stderr.
    pub fn capture(mut self) -> Result<Output, CommandError> {
        self.inner.output().map_err(|e| CommandError::CommandFailed {
            cmd: self.display(),
            source: e,
        })
    }
}
