//! bredos-config - BredOS system configurator

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use bredos_cli::{Cli, Commands, VERSION, cmd, tui};
use bredos_core::{CommandLog, RunSettings, Runner, Session, paths, running_as_root};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging; stderr keeps diagnostics out of command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = RunSettings {
        dry_run: cli.dry_run,
        root_mode: running_as_root(),
    };
    let mut runner = Runner::new(settings);
    if cli.log {
        let dir = cli.log_dir.clone().unwrap_or_else(paths::log_dir);
        let log = CommandLog::in_dir(&dir);
        tracing::debug!(path = %log.path().display(), "Logging commands");
        runner = runner.with_log(log);
    }
    let session = Session::new(runner, VERSION);

    match cli.command {
        None => {
            tui::run(&session).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Health { action }) => cmd::run::run(&session, action.action()).await,
        Some(Commands::Tweaks { target }) => cmd::run::run(&session, target.action()).await,
        Some(Commands::Packages { action }) => cmd::run::run(&session, action.action()).await,
        Some(Commands::Info { json }) => {
            cmd::info::info(&session, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::List) => {
            cmd::list::list();
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Completions { shell }) => {
            cmd::completions::completions(shell);
            Ok(ExitCode::SUCCESS)
        }
    }
}
