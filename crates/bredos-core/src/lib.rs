//! bredos-core - the engine behind `bredos-config`
//!
//! # Overview
//!
//! A fixed catalogue of maintenance actions for BredOS systems (filesystem
//! upkeep, package sets, small system tweaks), plus the machinery to run
//! them: privilege elevation through `pkexec`, dry-run, cancellation and a
//! per-session command log.
//!
//! # Architecture
//!
//! - **Catalogue**: [`ActionId`] names every action; [`ActionId::action`]
//!   describes what it does.
//! - **Menus**: [`MenuId`] arranges actions into the interactive menu tree.
//! - **Dispatch**: [`Session::perform`] is the only place actions are
//!   executed, so the CLI and TUI behave identically.
//! - **Reporter**: output reaches the user through the [`Reporter`] trait,
//!   keeping this crate free of terminal code.

pub mod action;
pub mod log;
pub mod menu;
pub mod paths;
pub mod reporter;
pub mod runner;
pub mod session;
pub mod system;
pub mod tweaks;

pub use action::{Action, ActionId, CommandSpec, Operation};
pub use log::CommandLog;
pub use menu::{APP_NAME, Cursor, Entry, Menu, MenuId};
pub use reporter::{NullReporter, Reporter};
pub use runner::{RunError, RunOutcome, RunSettings, Runner};
pub use session::{Outcome, Session, SessionError};
pub use system::{SystemInfo, running_as_root};
pub use tweaks::{PipewireFix, TweakError};

/// Re-exported so front ends can build cancellation handles without naming tokio-util.
pub use tokio_util::sync::CancellationToken;
