//! Single dispatch point for performing actions from any front end.

use crate::action::{ActionId, Operation};
use crate::reporter::Reporter;
use crate::runner::{RunError, RunOutcome, Runner};
use crate::system::SystemInfo;
use crate::tweaks::{self, TweakError};
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure while performing an action.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A command could not be run.
    #[error(transparent)]
    Run(#[from] RunError),

    /// A tweak could not be applied.
    #[error(transparent)]
    Tweak(#[from] TweakError),
}

/// What performing an action produced.
#[derive(Debug)]
pub enum Outcome {
    /// An external command ran (or was dry-run).
    Ran(RunOutcome),
    /// A native operation finished; show these lines to the user.
    Message(Vec<String>),
}

/// Everything needed to perform actions for one invocation.
#[derive(Debug, Clone)]
pub struct Session {
    runner: Runner,
    home: Option<PathBuf>,
    version: String,
}

impl Session {
    /// A session using the user's home directory.
    pub fn new(runner: Runner, version: impl Into<String>) -> Self {
        Self {
            runner,
            home: crate::paths::try_home(),
            version: version.into(),
        }
    }

    /// Override the home directory used for user-level tweaks.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Runner shared by every action.
    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Probe the host with this session's settings.
    pub fn system_info(&self) -> SystemInfo {
        SystemInfo::collect(&self.version, self.runner.settings())
    }

    /// Perform `id`, streaming any command output to `reporter`.
    ///
    /// # Errors
    ///
    /// Returns an error if a command cannot be run or a tweak cannot be
    /// written.
    pub async fn perform(
        &self,
        id: ActionId,
        reporter: &dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<Outcome, SessionError> {
        let action = id.action();
        reporter.section(action.title);
        tracing::debug!(action = ?id, "Performing action");

        match action.operation {
            Operation::Shell { command, elevate } => {
                let outcome = self.runner.run(&command, elevate, reporter, cancel).await?;
                Ok(Outcome::Ran(outcome))
            }
            Operation::PipewireFix => {
                let home = self.home.as_deref().ok_or(TweakError::NoHome)?;
                let state = tweaks::toggle_pipewire(home, self.runner.settings().dry_run)?;
                Ok(Outcome::Message(state.message()))
            }
            Operation::SystemInfo => Ok(Outcome::Message(self.system_info().lines())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use crate::runner::RunSettings;
    use tempfile::tempdir;

    fn dry_session() -> Session {
        Session::new(
            Runner::new(RunSettings {
                dry_run: true,
                root_mode: false,
            }),
            "test",
        )
    }

    #[tokio::test]
    async fn test_shell_action_dry_run() {
        let outcome = dry_session()
            .perform(ActionId::UnlockPacman, &NullReporter, &CancellationToken::new())
            .await
            .unwrap();
        let Outcome::Ran(RunOutcome::DryRun { line }) = outcome else {
            panic!("expected dry run");
        };
        assert!(line.starts_with("DRYRUN: pkexec bash -c "));
        assert!(line.contains("/var/lib/pacman/db.lck"));
    }

    #[tokio::test]
    async fn test_pipewire_uses_session_home() {
        let home = tempdir().unwrap();
        let session = Session::new(Runner::new(RunSettings::default()), "test")
            .with_home(home.path());

        let outcome = session
            .perform(ActionId::PipewireFix, &NullReporter, &CancellationToken::new())
            .await
            .unwrap();
        let Outcome::Message(lines) = outcome else {
            panic!("expected message");
        };
        assert_eq!(lines[0], "Pipewire CPU fix applied.");
        assert!(crate::paths::pipewire_service_path(home.path()).exists());
    }

    #[tokio::test]
    async fn test_system_info_is_message() {
        let outcome = dry_session()
            .perform(ActionId::SystemInfo, &NullReporter, &CancellationToken::new())
            .await
            .unwrap();
        let Outcome::Message(lines) = outcome else {
            panic!("expected message");
        };
        assert_eq!(lines[0], "BredOS Configurator test");
    }
}
