//! Host probing: privileges, filesystem and board details.

use crate::paths::{DEVICE_TREE_MODEL_PATH, KERNEL_RELEASE_PATH, MOUNTS_PATH};
use crate::runner::RunSettings;
use serde::Serialize;

/// Tools the configurator relies on, reported by `info`.
pub const PROBED_TOOLS: &[&str] = &["dtc", "pkexec", "btrfs", "pacman", "systemctl"];

/// True when the effective user is root.
#[allow(unsafe_code)]
pub fn running_as_root() -> bool {
    // SAFETY: geteuid(2) takes no arguments and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Filesystem type mounted at `/`, from a mount table in `/proc/mounts` format.
///
/// Later entries shadow earlier ones, so the last `/` mount wins.
pub fn root_fstype(mounts: &str) -> Option<String> {
    mounts.lines().rev().find_map(|line| {
        let mut fields = line.split_whitespace();
        let _device = fields.next()?;
        let mountpoint = fields.next()?;
        let fstype = fields.next()?;
        (mountpoint == "/").then(|| fstype.to_string())
    })
}

/// Board model from raw device-tree bytes (NUL-terminated).
pub fn board_model(raw: &[u8]) -> Option<String> {
    let model = String::from_utf8_lossy(raw)
        .trim_end_matches('\0')
        .trim()
        .to_string();
    (!model.is_empty()).then_some(model)
}

/// Whether one external tool is on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// Executable name.
    pub name: String,
    /// Found on `PATH`.
    pub available: bool,
}

/// Snapshot of the host, shown by `bredos-config info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    /// Application version.
    pub version: String,
    /// Commands are only printed.
    pub dry_run: bool,
    /// Running as root, so no elevation is used.
    pub root_mode: bool,
    /// Filesystem type of `/`.
    pub root_fstype: Option<String>,
    /// Device-tree board model.
    pub board_model: Option<String>,
    /// Kernel release.
    pub kernel: Option<String>,
    /// Availability of [`PROBED_TOOLS`].
    pub tools: Vec<ToolStatus>,
}

impl SystemInfo {
    /// Probe the running system.
    pub fn collect(version: &str, settings: RunSettings) -> Self {
        let root_fstype = std::fs::read_to_string(MOUNTS_PATH)
            .ok()
            .and_then(|m| root_fstype(&m));
        let board_model = std::fs::read(DEVICE_TREE_MODEL_PATH)
            .ok()
            .and_then(|raw| board_model(&raw));
        let kernel = std::fs::read_to_string(KERNEL_RELEASE_PATH)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let tools = PROBED_TOOLS
            .iter()
            .map(|name| ToolStatus {
                name: (*name).to_string(),
                available: which::which(name).is_ok(),
            })
            .collect();

        tracing::debug!(?root_fstype, ?board_model, "Collected system info");
        Self {
            version: version.to_string(),
            dry_run: settings.dry_run,
            root_mode: settings.root_mode,
            root_fstype,
            board_model,
            kernel,
            tools,
        }
    }

    /// Human-readable report.
    pub fn lines(&self) -> Vec<String> {
        let unknown = || "unknown".to_string();
        let yes_no = |b: bool| if b { "yes" } else { "no" };

        let mut lines = vec![
            format!("{} {}", crate::menu::APP_NAME, self.version),
            String::new(),
            format!("Board:        {}", self.board_model.clone().unwrap_or_else(unknown)),
            format!("Kernel:       {}", self.kernel.clone().unwrap_or_else(unknown)),
            format!("Root fs:      {}", self.root_fstype.clone().unwrap_or_else(unknown)),
            format!("Root mode:    {}", yes_no(self.root_mode)),
            format!("Dry run:      {}", yes_no(self.dry_run)),
            String::new(),
            "Tools:".to_string(),
        ];
        for tool in &self.tools {
            let state = if tool.available { "found" } else { "missing" };
            lines.push(format!("  {:<12}{state}", tool.name));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUNTS: &str = "\
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
/dev/mmcblk0p2 / btrfs rw,relatime,compress=zstd:3,subvol=/@ 0 0
/dev/mmcblk0p1 /boot vfat rw,relatime 0 0
";

    #[test]
    fn test_root_fstype() {
        assert_eq!(root_fstype(MOUNTS).as_deref(), Some("btrfs"));
        assert_eq!(root_fstype("proc /proc proc rw 0 0\n"), None);
        assert_eq!(root_fstype(""), None);
    }

    #[test]
    fn test_root_fstype_last_mount_wins() {
        let mounts = "rootfs / rootfs rw 0 0\n/dev/sda2 / ext4 rw 0 0\n";
        assert_eq!(root_fstype(mounts).as_deref(), Some("ext4"));
    }

    #[test]
    fn test_board_model_trims_nul() {
        assert_eq!(
            board_model(b"Radxa ROCK 5B\0").as_deref(),
            Some("Radxa ROCK 5B")
        );
        assert_eq!(board_model(b"\0"), None);
    }

    fn sample() -> SystemInfo {
        SystemInfo {
            version: "1.0.0".to_string(),
            dry_run: true,
            root_mode: false,
            root_fstype: Some("btrfs".to_string()),
            board_model: None,
            kernel: Some("6.1.75-rockchip".to_string()),
            tools: vec![ToolStatus {
                name: "dtc".to_string(),
                available: true,
            }],
        }
    }

    #[test]
    fn test_lines() {
        let lines = sample().lines();
        assert_eq!(lines[0], "BredOS Configurator 1.0.0");
        assert!(lines.contains(&"Board:        unknown".to_string()));
        assert!(lines.contains(&"Root fs:      btrfs".to_string()));
        assert!(lines.contains(&"Dry run:      yes".to_string()));
        assert_eq!(lines.last().unwrap(), "  dtc         found");
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["root_fstype"], "btrfs");
        assert_eq!(json["board_model"], serde_json::Value::Null);
        assert_eq!(json["tools"][0]["available"], true);
    }

    #[test]
    fn test_collect_reports_settings() {
        let info = SystemInfo::collect(
            "0.0.0",
            RunSettings {
                dry_run: true,
                root_mode: false,
            },
        );
        assert!(info.dry_run);
        assert_eq!(info.tools.len(), PROBED_TOOLS.len());
    }
}
