//! Filesystem locations used by the configurator.

use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Environment variable overriding where command logs are written.
pub const LOG_DIR_ENV: &str = "BREDOS_CONFIG_LOG_DIR";

/// Returns the user's home directory, or None if it cannot be resolved.
pub fn try_home() -> Option<PathBuf> {
    home_dir()
}

/// Directory command logs are written to.
///
/// `BREDOS_CONFIG_LOG_DIR` wins; otherwise the current working directory,
/// falling back to `.` if even that cannot be read.
pub fn log_dir() -> PathBuf {
    if let Ok(val) = std::env::var(LOG_DIR_ENV) {
        return PathBuf::from(val);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Log file name for a session started at `started`: `bredos-config-<YYYYmmdd-HHMMSS>.txt`
pub fn log_file_name(started: chrono::NaiveDateTime) -> String {
    format!("bredos-config-{}.txt", started.format("%Y%m%d-%H%M%S"))
}

/// Full log path for a session started now, inside `dir`.
pub fn session_log_path(dir: &Path) -> PathBuf {
    dir.join(log_file_name(chrono::Local::now().naive_local()))
}

/// User systemd unit override for pipewire, relative to `home`.
pub fn pipewire_service_path(home: &Path) -> PathBuf {
    home.join(".config/systemd/user/pipewire.service")
}

/// Kernel mount table of the current process.
pub const MOUNTS_PATH: &str = "/proc/self/mounts";

/// Board model string exposed by the device tree.
pub const DEVICE_TREE_MODEL_PATH: &str = "/proc/device-tree/model";

/// Running kernel release.
pub const KERNEL_RELEASE_PATH: &str = "/proc/sys/kernel/osrelease";
