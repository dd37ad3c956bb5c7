//! Command runner
//!
//! Spawns external commands, streams their combined output to a
//! [`Reporter`] line by line, and honours dry-run, elevation, cancellation
//! and the session command log.

use crate::action::{CommandSpec, ELEVATOR};
use crate::log::CommandLog;
use crate::reporter::Reporter;
use std::ffi::{OsStr, OsString};
use std::os::fd::OwnedFd;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::unix::pipe;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// Why a command could not be run.
#[derive(Error, Debug)]
pub enum RunError {
    /// The program could not be started.
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Elevation is needed but `pkexec` is not installed.
    #[error("`pkexec` was not found in PATH; run bredos-config as root instead")]
    ElevationUnavailable,

    /// Creating or reading the output pipe failed.
    #[error("Failed to read command output: {0}")]
    Io(#[from] std::io::Error),
}

/// Session-wide switches that change how commands are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSettings {
    /// Print commands instead of executing them.
    pub dry_run: bool,
    /// Already running as root; elevation is skipped.
    pub root_mode: bool,
}

/// Result of running one command.
#[derive(Debug)]
pub enum RunOutcome {
    /// Dry run; `line` is what was printed instead of executing.
    DryRun {
        /// `DRYRUN: <command>`.
        line: String,
    },
    /// The command ran to completion (successfully or not).
    Completed {
        /// Combined stdout and stderr, one line per `\n`.
        output: String,
        /// How the process exited.
        status: ExitStatus,
    },
    /// The user interrupted the command and it was killed.
    Aborted,
}

impl RunOutcome {
    /// True for dry runs and commands that exited with status 0.
    pub fn is_success(&self) -> bool {
        match self {
            Self::DryRun { .. } => true,
            Self::Completed { status, .. } => status.success(),
            Self::Aborted => false,
        }
    }

    /// Exit code of a completed command, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Completed { status, .. } => status.code(),
            _ => None,
        }
    }

    /// Everything the command printed (or the dry-run line).
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::DryRun { line } => Some(line),
            Self::Completed { output, .. } => Some(output),
            Self::Aborted => None,
        }
    }

    /// Short status word shown after a run: `OK`, `FAILED (exit status N)` or `ABORTED`.
    pub fn status_label(&self) -> String {
        match self {
            Self::Aborted => "ABORTED".to_string(),
            Self::Completed { status, .. } if !status.success() => match status.code() {
                Some(code) => format!("FAILED (exit status {code})"),
                None => "FAILED (killed by signal)".to_string(),
            },
            _ => "OK".to_string(),
        }
    }
}

/// Executes commands according to [`RunSettings`].
#[derive(Debug, Clone)]
pub struct Runner {
    settings: RunSettings,
    log: Option<CommandLog>,
    search_path: Option<OsString>,
}

impl Runner {
    /// A runner without a command log.
    pub fn new(settings: RunSettings) -> Self {
        Self {
            settings,
            log: None,
            search_path: None,
        }
    }

    /// Record every non-aborted run in `log`.
    pub fn with_log(mut self, log: CommandLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Look for `pkexec` in `path` (a `PATH`-style list) instead of `PATH`.
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Switches this runner was created with.
    pub fn settings(&self) -> RunSettings {
        self.settings
    }

    /// Command log, when logging is enabled.
    pub fn log(&self) -> Option<&CommandLog> {
        self.log.as_ref()
    }

    /// The command as it will actually be spawned.
    pub fn effective_command(&self, command: &CommandSpec, elevate: bool) -> CommandSpec {
        if elevate && !self.settings.root_mode {
            command.elevated()
        } else {
            command.clone()
        }
    }

    /// Run `command`, streaming its output to `reporter`.
    ///
    /// Cancelling `cancel` kills the child and yields [`RunOutcome::Aborted`].
    ///
    /// # Errors
    ///
    /// Returns an error if elevation is needed but `pkexec` is missing, if the
    /// process cannot be spawned, or if reading its output fails.
    pub async fn run(
        &self,
        command: &CommandSpec,
        elevate: bool,
        reporter: &dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, RunError> {
        let effective = self.effective_command(command, elevate);
        reporter.command(&command.display(), elevate);

        if self.settings.dry_run {
            let line = format!("DRYRUN: {}", effective.display());
            reporter.line(&line);
            self.record(&effective, &line, reporter);
            return Ok(RunOutcome::DryRun { line });
        }

        if effective.program == ELEVATOR && find_elevator(self.search_path.as_deref()).is_none() {
            return Err(RunError::ElevationUnavailable);
        }

        // stdout and stderr share one pipe so lines keep the order they were written in.
        let (reader, writer) = std::io::pipe()?;
        let stderr_writer = writer.try_clone()?;

        tracing::debug!(command = %effective, "Spawning command");
        let mut child = Command::new(&effective.program)
            .args(&effective.args)
            .stdout(writer)
            .stderr(stderr_writer)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: effective.program.clone(),
                source,
            })?;

        let mut reader = BufReader::new(pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?);
        let mut buf = Vec::new();
        let mut output = String::new();
        loop {
            buf.clear();
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    kill(&mut child).await;
                    return Ok(RunOutcome::Aborted);
                }
                read = reader.read_until(b'\n', &mut buf) => match read {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = decode_line(&buf);
                        reporter.line(&line);
                        output.push_str(&line);
                        output.push('\n');
                    }
                    Err(e) => {
                        kill(&mut child).await;
                        return Err(e.into());
                    }
                },
            }
        }

        let status = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                kill(&mut child).await;
                return Ok(RunOutcome::Aborted);
            }
            status = child.wait() => status?,
        };
        tracing::debug!(command = %effective, ?status, "Command finished");

        // A terminal Ctrl-C reaches the child too; it may exit before the token is cancelled.
        if cancel.is_cancelled() || status.signal() == Some(libc::SIGINT) {
            return Ok(RunOutcome::Aborted);
        }

        self.record(&effective, &output, reporter);
        Ok(RunOutcome::Completed { output, status })
    }

    fn record(&self, command: &CommandSpec, output: &str, reporter: &dyn Reporter) {
        let Some(log) = &self.log else {
            return;
        };
        if let Err(e) = log.append(&command.display(), output) {
            tracing::warn!(path = %log.path().display(), error = %e, "Failed to write command log");
            reporter.warning(&format!(
                "Could not write log {}: {e}",
                log.path().display()
            ));
        }
    }
}

async fn kill(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::debug!(error = %e, "Child already exited");
    }
    let _ = child.wait().await;
}

/// Lossily decode one raw output line and strip its line ending.
fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

/// Locate `pkexec` in `search_path`, or in `PATH` when none is given.
pub fn find_elevator(search_path: Option<&OsStr>) -> Option<PathBuf> {
    match search_path {
        Some(paths) => which::which_in(ELEVATOR, Some(paths), "/").ok(),
        None => which::which(ELEVATOR).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder {
        commands: Mutex<Vec<(String, bool)>>,
        lines: Mutex<Vec<String>>,
    }

    impl Reporter for Recorder {
        fn section(&self, _: &str) {}
        fn command(&self, display: &str, elevated: bool) {
            self.commands
                .lock()
                .unwrap()
                .push((display.to_string(), elevated));
        }
        fn line(&self, text: &str) {
            self.lines.lock().unwrap().push(text.to_string());
        }
        fn warning(&self, _: &str) {}
    }

    fn plain() -> Runner {
        Runner::new(RunSettings::default())
    }

    #[tokio::test]
    async fn test_streams_stdout_and_stderr() {
        let reporter = Recorder::default();
        let cmd = CommandSpec::shell("sh", "echo out; echo err 1>&2");
        let outcome = plain()
            .run(&cmd, false, &reporter, &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.output(), Some("out\nerr\n"));
        assert_eq!(
            reporter.commands.lock().unwrap()[0],
            ("sh -c echo out; echo err 1>&2".to_string(), false)
        );
    }

    #[tokio::test]
    async fn test_interleaved_streams_keep_write_order() {
        let dir = tempdir().unwrap();
        let log = CommandLog::new(dir.path().join("log.txt"));
        let runner = plain().with_log(log.clone());
        let cmd = CommandSpec::shell("sh", "echo a; echo b 1>&2; echo c");

        for _ in 0..20 {
            let reporter = Recorder::default();
            let outcome = runner
                .run(&cmd, false, &reporter, &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(reporter.lines.lock().unwrap().as_slice(), ["a", "b", "c"]);
            assert_eq!(outcome.output(), Some("a\nb\nc\n"));
        }

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.starts_with("$ sh -c echo a; echo b 1>&2; echo c\na\nb\nc\n\n"));
    }

    #[tokio::test]
    async fn test_missing_pkexec_is_an_error() {
        let empty = tempdir().unwrap();
        let runner = plain().with_search_path(empty.path());
        let cmd = CommandSpec::shell("sh", "echo hi");

        let err = runner
            .run(&cmd, true, &NullReporter, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::ElevationUnavailable));
    }

    #[tokio::test]
    async fn test_root_mode_needs_no_pkexec() {
        let empty = tempdir().unwrap();
        let runner = Runner::new(RunSettings {
            dry_run: false,
            root_mode: true,
        })
        .with_search_path(empty.path());
        let cmd = CommandSpec::shell("sh", "echo hi");

        let outcome = runner
            .run(&cmd, true, &NullReporter, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.output(), Some("hi\n"));
    }

    #[test]
    fn test_find_elevator_in_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        assert!(find_elevator(Some(dir.path().as_os_str())).is_none());

        let fake = dir.path().join(ELEVATOR);
        std::fs::write(&fake, "#!/bin/sh\nexec \"$@\"\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_elevator(Some(dir.path().as_os_str())), Some(fake));
    }

    #[tokio::test]
    async fn test_child_killed_by_sigint_is_aborted() {
        let dir = tempdir().unwrap();
        let log = CommandLog::new(dir.path().join("log.txt"));
        let runner = plain().with_log(log.clone());
        let reporter = Recorder::default();

        let cmd = CommandSpec::shell("sh", "echo partial; kill -INT $$");
        let outcome = runner
            .run(&cmd, false, &reporter, &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Aborted));
        assert_eq!(reporter.lines.lock().unwrap().as_slice(), ["partial"]);
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported() {
        let cmd = CommandSpec::shell("sh", "exit 3");
        let outcome = plain()
            .run(&cmd, false, &NullReporter, &CancellationToken::new())
            .await
            .unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.exit_code(), Some(3));
        assert_eq!(outcome.status_label(), "FAILED (exit status 3)");
    }

    #[tokio::test]
    async fn test_dry_run_elevated_without_root() {
        let runner = Runner::new(RunSettings {
            dry_run: true,
            root_mode: false,
        });
        let reporter = Recorder::default();
        let cmd = CommandSpec::shell("sh", "echo hi");
        let outcome = runner
            .run(&cmd, true, &reporter, &CancellationToken::new())
            .await
            .unwrap();

        match &outcome {
            RunOutcome::DryRun { line } => assert_eq!(line, "DRYRUN: pkexec sh -c echo hi"),
            other => panic!("expected dry run, got {other:?}"),
        }
        assert_eq!(outcome.status_label(), "OK");
        assert_eq!(
            reporter.lines.lock().unwrap().as_slice(),
            ["DRYRUN: pkexec sh -c echo hi"]
        );
        // The displayed command never carries the pkexec prefix.
        assert_eq!(
            reporter.commands.lock().unwrap()[0],
            ("sh -c echo hi".to_string(), true)
        );
    }

    #[tokio::test]
    async fn test_root_mode_skips_elevation() {
        let runner = Runner::new(RunSettings {
            dry_run: true,
            root_mode: true,
        });
        let cmd = CommandSpec::shell("sh", "echo hi");
        let outcome = runner
            .run(&cmd, true, &NullReporter, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.output(), Some("DRYRUN: sh -c echo hi"));
    }

    #[tokio::test]
    async fn test_cancel_aborts_and_skips_log() {
        let dir = tempdir().unwrap();
        let log = CommandLog::new(dir.path().join("log.txt"));
        let runner = plain().with_log(log.clone());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let cmd = CommandSpec::new("sleep", ["10"]);
        let started = std::time::Instant::now();
        let outcome = runner
            .run(&cmd, false, &NullReporter, &cancel)
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::Aborted));
        assert_eq!(outcome.status_label(), "ABORTED");
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!log.path().exists());
    }

    #[tokio::test]
    async fn test_completed_run_is_logged() {
        let dir = tempdir().unwrap();
        let log = CommandLog::new(dir.path().join("log.txt"));
        let runner = plain().with_log(log.clone());

        let cmd = CommandSpec::shell("sh", "echo hello");
        runner
            .run(&cmd, false, &NullReporter, &CancellationToken::new())
            .await
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "$ sh -c echo hello\nhello\n\n");
    }

    #[tokio::test]
    async fn test_dry_run_is_logged() {
        let dir = tempdir().unwrap();
        let log = CommandLog::new(dir.path().join("log.txt"));
        let runner = Runner::new(RunSettings {
            dry_run: true,
            root_mode: true,
        })
        .with_log(log.clone());

        let cmd = CommandSpec::shell("sh", "echo hi");
        runner
            .run(&cmd, false, &NullReporter, &CancellationToken::new())
            .await
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "$ sh -c echo hi\nDRYRUN: sh -c echo hi\n");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let cmd = CommandSpec::new("bredos-config-no-such-program", Vec::<String>::new());
        let err = plain()
            .run(&cmd, false, &NullReporter, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }
}
