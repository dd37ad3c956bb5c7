//! Append-only transcript of executed commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Transcript file for one configurator session.
///
/// The file is created on first append, so sessions that never run a
/// command leave nothing behind.
#[derive(Debug, Clone)]
pub struct CommandLog {
    path: PathBuf,
}

impl CommandLog {
    /// A log writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A log named after the current time, inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(crate::paths::session_log_path(dir))
    }

    /// Where the transcript is written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `$ <command>` followed by its output and a blank separator.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, command: &str, output: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(file, "$ {command}\n{output}\n")?;
        tracing::debug!(path = %self.path.display(), "Appended command log entry");
        Ok(())
    }
}
