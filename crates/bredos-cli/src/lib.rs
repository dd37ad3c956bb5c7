//! bredos-config - BredOS system configurator
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Runs without arguments as a full-screen menu; every action is also
//! reachable as a subcommand for scripting.
//!
//! ```text
//! bredos-config                          # interactive menu
//! bredos-config --dryrun packages install docker
//! bredos-config --log health maintenance # transcript in ./bredos-config-<date>.txt
//! ```

pub mod cmd;
pub mod tui;
pub mod ui;

use bredos_core::ActionId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Version reported by `--version` and `info`, derived from git tags at build time.
pub const VERSION: &str = env!("BREDOS_CONFIG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "bredos-config")]
#[command(author, version = VERSION, about = "BredOS Configurator")]
pub struct Cli {
    /// Log output to bredos-config-<date>.txt
    #[arg(long, global = true, env = "BREDOS_CONFIG_LOG")]
    pub log: bool,

    /// Directory for the log file (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR", env = "BREDOS_CONFIG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Simulate running commands (SAFE)
    #[arg(
        long = "dryrun",
        visible_alias = "dry-run",
        global = true,
        env = "BREDOS_CONFIG_DRYRUN"
    )]
    pub dry_run: bool,

    /// Start the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filesystem maintenance and repair
    Health {
        #[command(subcommand)]
        action: HealthCommands,
    },
    /// Optional system tweaks
    Tweaks {
        #[command(subcommand)]
        target: TweakCommands,
    },
    /// Package installation and housekeeping
    Packages {
        #[command(subcommand)]
        action: PackageCommands,
    },
    /// Show board, kernel and tool information
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every action with the command that runs it
    List,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

impl Commands {
    /// The catalogue action this command performs, if it performs one.
    pub fn action(&self) -> Option<ActionId> {
        match self {
            Self::Health { action } => Some(action.action()),
            Self::Tweaks { target } => Some(target.action()),
            Self::Packages { action } => Some(action.action()),
            Self::Info { .. } => Some(ActionId::SystemInfo),
            Self::List | Self::Completions { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum HealthCommands {
    /// Balance a btrfs root filesystem
    Maintenance,
    /// Scrub a btrfs root filesystem
    Check,
    /// Grow the root filesystem on next boot
    Expand,
    /// Check installed package files for modifications
    Integrity,
}

impl HealthCommands {
    pub fn action(self) -> ActionId {
        match self {
            Self::Maintenance => ActionId::FilesystemMaintenance,
            Self::Check => ActionId::FilesystemCheck,
            Self::Expand => ActionId::FilesystemExpand,
            Self::Integrity => ActionId::PackagesIntegrity,
        }
    }
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum TweakCommands {
    /// Toggle the pipewire CPU usage cap
    Pipewire,
    /// Toggle Wake On Lan support
    Wol,
}

impl TweakCommands {
    pub fn action(self) -> ActionId {
        match self {
            Self::Pipewire => ActionId::PipewireFix,
            Self::Wol => ActionId::WakeOnLan,
        }
    }
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum PackageCommands {
    /// Install a package set
    Install {
        #[command(subcommand)]
        target: InstallTarget,
    },
    /// Check installed package files for modifications
    Integrity,
    /// Remove a stale pacman database lock
    Unlock,
    /// Remove orphaned dependencies
    Autoremove,
}

impl PackageCommands {
    pub fn action(self) -> ActionId {
        match self {
            Self::Install { target } => target.action(),
            Self::Integrity => ActionId::PackagesIntegrity,
            Self::Unlock => ActionId::UnlockPacman,
            Self::Autoremove => ActionId::Autoremove,
        }
    }
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum InstallTarget {
    /// Recommended desktop applications
    Recommends,
    /// Docker engine, buildx and compose
    Docker,
    /// Steam with generic runtime libraries
    SteamAny,
    /// Steam with RK3588 (Panfork graphics) libraries
    SteamPanfork,
    /// BredOS image and kernel development tools
    Development,
}

impl InstallTarget {
    pub fn action(self) -> ActionId {
        match self {
            Self::Recommends => ActionId::InstallRecommends,
            Self::Docker => ActionId::InstallDocker,
            Self::SteamAny => ActionId::InstallSteamAny,
            Self::SteamPanfork => ActionId::InstallSteamPanfork,
            Self::Development => ActionId::InstallDevelopment,
        }
    }
}
