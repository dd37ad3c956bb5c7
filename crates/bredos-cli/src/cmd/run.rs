//! Run a catalogue action from the command line

use anyhow::{Context, Result};
use bredos_core::{ActionId, CancellationToken, Outcome, Session};
use crate::ui::ConsoleReporter;
use std::process::ExitCode;

/// Perform `id`, streaming output to stdout. Ctrl-C aborts a running command.
pub async fn run(session: &Session, id: ActionId) -> Result<ExitCode> {
    let reporter = ConsoleReporter::new();
    let cancel = CancellationToken::new();

    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupt received, aborting command");
                cancel.cancel();
            }
        })
    };

    let result = session.perform(id, &reporter, &cancel).await;
    watcher.abort();

    let outcome = result.with_context(|| format!("{} failed", id.title()))?;
    let code = match outcome {
        Outcome::Message(lines) => {
            reporter.message(&lines);
            ExitCode::SUCCESS
        }
        Outcome::Ran(run) => {
            reporter.finished(&run);
            if run.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    };

    if let Some(log) = session.runner().log() {
        if log.path().exists() {
            tracing::info!(path = %log.path().display(), "Command log written");
        }
    }
    Ok(code)
}
