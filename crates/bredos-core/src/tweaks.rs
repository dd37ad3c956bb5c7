//! User-level system tweaks that are applied by writing files, not commands.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// User unit replacing the packaged pipewire service with a CPU-capped one.
pub const PIPEWIRE_SERVICE: &str = "\
[Unit]
Description=PipeWire Multimedia Service

# We require pipewire.socket to be active before starting the daemon, because
# while it is possible to use the service without the socket, it is not clear
# why it would be desirable.
#
# A user installing pipewire and doing `systemctl --user start pipewire`
# will not get the socket started, which might be confusing and problematic if
# the server is to be restarted later on, as the client autospawn feature
# might kick in. Also, a start of the socket unit will fail, adding to the
# confusion.
#
# After=pipewire.socket is not needed, as it is already implicit in the
# socket-service relationship, see systemd.socket(5).
Requires=pipewire.socket

[Service]
CPUAccounting=true
CPUQuota=10%
LockPersonality=yes
MemoryDenyWriteExecute=yes
NoNewPrivileges=yes
RestrictNamespaces=yes
SystemCallArchitectures=native
SystemCallFilter=@system-service
Type=simple
ExecStart=/usr/bin/pipewire
Restart=on-failure
Slice=session.slice

[Install]
Also=pipewire.socket
WantedBy=default.target
";

/// Failure while applying a tweak.
#[derive(Error, Debug)]
pub enum TweakError {
    /// No home directory to write user units into.
    #[error("Could not determine home directory")]
    NoHome,

    /// Reading or writing `path` failed.
    #[error("Failed to update {path}: {source}")]
    Io {
        /// File or directory being changed.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// State the pipewire override ends up in after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipewireFix {
    /// The override unit was written.
    Applied,
    /// The override unit was deleted.
    Removed,
}

impl PipewireFix {
    /// Lines shown to the user after toggling.
    pub fn message(self) -> Vec<String> {
        let verb = match self {
            Self::Applied => "applied",
            Self::Removed => "removed",
        };
        vec![
            format!("Pipewire CPU fix {verb}."),
            "Relog or Reboot to apply.".to_string(),
        ]
    }
}

/// Toggle the pipewire override under `home`.
///
/// An existing unit is removed; otherwise it is written, creating parent
/// directories. With `dry_run` the filesystem is left untouched and the
/// state that would have been reached is returned.
///
/// # Errors
///
/// Returns an error if the unit file or its directory cannot be changed.
pub fn toggle_pipewire(home: &Path, dry_run: bool) -> Result<PipewireFix, TweakError> {
    let path = crate::paths::pipewire_service_path(home);
    let io_err = |source| TweakError::Io {
        path: path.clone(),
        source,
    };

    if path.exists() {
        if !dry_run {
            std::fs::remove_file(&path).map_err(io_err)?;
            tracing::info!(path = %path.display(), "Removed pipewire override");
        }
        return Ok(PipewireFix::Removed);
    }

    if !dry_run {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&path, PIPEWIRE_SERVICE).map_err(io_err)?;
        tracing::info!(path = %path.display(), "Installed pipewire override");
    }
    Ok(PipewireFix::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_toggle_applies_then_removes() {
        let home = tempdir().unwrap();
        let unit = crate::paths::pipewire_service_path(home.path());

        assert_eq!(toggle_pipewire(home.path(), false).unwrap(), PipewireFix::Applied);
        let written = std::fs::read_to_string(&unit).unwrap();
        assert!(written.contains("CPUQuota=10%"));
        assert!(written.contains("ExecStart=/usr/bin/pipewire"));

        assert_eq!(toggle_pipewire(home.path(), false).unwrap(), PipewireFix::Removed);
        assert!(!unit.exists());
    }

    #[test]
    fn test_dry_run_leaves_filesystem_alone() {
        let home = tempdir().unwrap();
        let unit = crate::paths::pipewire_service_path(home.path());

        assert_eq!(toggle_pipewire(home.path(), true).unwrap(), PipewireFix::Applied);
        assert!(!unit.exists());
        assert!(!home.path().join(".config").exists());

        std::fs::create_dir_all(unit.parent().unwrap()).unwrap();
        std::fs::write(&unit, "custom").unwrap();
        assert_eq!(toggle_pipewire(home.path(), true).unwrap(), PipewireFix::Removed);
        assert_eq!(std::fs::read_to_string(&unit).unwrap(), "custom");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            PipewireFix::Applied.message(),
            vec!["Pipewire CPU fix applied.", "Relog or Reboot to apply."]
        );
        assert_eq!(PipewireFix::Removed.message()[0], "Pipewire CPU fix removed.");
    }
}
