//! Action catalogue
//!
//! Every maintenance task the configurator offers, independent of the front
//! end that triggers it. Shell actions are fixed scripts handed to an
//! interpreter with `-c`; the remaining operations are implemented natively.

use std::fmt;

/// Program used to gain root for elevated commands.
pub const ELEVATOR: &str = "pkexec";

/// Desktop applications suggested for a fresh install.
pub const RECOMMENDED_PACKAGES: &[&str] = &[
    "webcord-bin",
    "ayugram-desktop",
    "thunderbird",
    "gnome-disk-utility",
    "mpv",
    "libreoffice-fresh",
    "timeshift",
    "proton-run",
    "evince",
    "loupe",
];

/// Docker engine and tooling.
pub const DOCKER_PACKAGES: &[&str] = &["docker", "docker-buildx", "docker-compose", "pigz"];

/// Steam with the generic runtime libraries.
pub const STEAM_ANY_PACKAGES: &[&str] = &["steam", "steam-libs-any"];

/// Steam with the RK3588 (Panfork) runtime libraries.
pub const STEAM_PANFORK_PACKAGES: &[&str] = &["steam", "steam-libs-rk3588"];

/// Toolchain for building BredOS images and kernels.
pub const DEVELOPMENT_PACKAGES: &[&str] = &[
    "python-prettytable",
    "grub",
    "parted",
    "gptfdisk",
    "edk2-rk3588-devel",
    "dtc",
    "xmlto",
    "docbook-xsl",
    "kmod",
    "bc",
    "uboot-tools",
    "vboot-utils",
    "bredos-tools",
];

const FS_MAINTENANCE_SCRIPT: &str = r#"findmnt -n -o FSTYPE / | grep -q btrfs && echo "Detected BTRFS root, performing balance operation." && btrfs balance start -dusage=20 -musage=20 /"#;

const FS_CHECK_SCRIPT: &str = r#"findmnt -n -o FSTYPE / | grep -q btrfs && echo "Detected BTRFS root, performing scrub operation." && btrfs scrub start -Bd /"#;

const FS_EXPAND_SCRIPT: &str =
    r#"systemctl enable resizefs && echo "The filesystem will be resized on next reboot!""#;

const WOL_SCRIPT: &str = r#"pacman -Qi bredos-wol &>/dev/null && echo "Removing.." && pacman -R --noconfirm bredos-wol || { echo "Installing.."; pacman -Sy; pacman -S --noconfirm bredos-wol; }"#;

// Reports files flagged by `pacman -Qkk`, skipping user-editable config,
// docs and caches, then summarises issue counts per package.
const INTEGRITY_SCRIPT: &str = r#"echo "Running.." && pacman -Qkk 2>/dev/null | awk '
/:.*(missing|Size mismatch|MODIFIED)/ &&
$0 !~ /\.json|\.conf|\.pac(new|save|orig)/ &&
$0 !~ /\/\.?(bashrc|bash_profile|zshrc|profile)$/ &&
$0 !~ /^.*\/etc\/(shells|subgid|subuid|environment|sudoers|passwd|shadow|group|gshadow|fstab|mtab|issue|default\/|skel\/|locale\.gen|ssh\/|libvirt\/)/ &&
$0 !~ /\/usr\/share\/(doc|man)|\.cache/ {
    pkg = gensub(/:.*$/, "", 1, $0);
    issues[pkg]++;
    print;
    found = 1;
}
END {
    if (found) {
        print "\n==== Summary ====";
        for (p in issues) print p ": " issues[p] " issue(s)";
    } else {
        print "+++ No integrity issues found. +++";
    }
}
'"#;

const DOCKER_SERVICES_SCRIPT: &str = " && systemctl disable --now systemd-networkd-wait-online && systemctl mask systemd-networkd-wait-online && systemctl enable --now docker";

const UNLOCK_SCRIPT: &str = r#"[ -f /var/lib/pacman/db.lck ] && ! pgrep -x pacman >/dev/null && { rm -f /var/lib/pacman/db.lck && echo "Pacman DB lock removed."; } || echo "No action needed.""#;

const AUTOREMOVE_SCRIPT: &str =
    "while pacman -Qdtq >/dev/null 2>&1; do pacman -Rns --noconfirm $(pacman -Qdtq); done";

/// Build `pacman -Sy && pacman -S --noconfirm --needed <packages>`.
pub fn pacman_install_script(packages: &[&str]) -> String {
    let mut script = String::from("pacman -Sy && pacman -S --noconfirm --needed");
    for pkg in packages {
        script.push(' ');
        script.push_str(pkg);
    }
    script
}

/// A program and its arguments, spawned without an intermediate shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// `program` with `args`.
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `<interpreter> -c <script>`
    pub fn shell(interpreter: &str, script: impl Into<String>) -> Self {
        Self {
            program: interpreter.to_string(),
            args: vec!["-c".to_string(), script.into()],
        }
    }

    /// The same command prefixed with `pkexec`.
    pub fn elevated(&self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program.clone());
        args.extend(self.args.iter().cloned());
        Self {
            program: ELEVATOR.to_string(),
            args,
        }
    }

    /// Space-joined form used for display and the command log.
    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// What performing an action actually does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Run an external command, optionally as root.
    Shell {
        /// Command to spawn.
        command: CommandSpec,
        /// Run through `pkexec` unless already root.
        elevate: bool,
    },
    /// Toggle the user-level pipewire CPU quota override.
    PipewireFix,
    /// Collect and display system information.
    SystemInfo,
}

/// A fully described action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Catalogue identifier.
    pub id: ActionId,
    /// Screen heading.
    pub title: &'static str,
    /// What the action does.
    pub operation: Operation,
}

/// Identifier of every action the configurator offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    /// Balance a btrfs root.
    FilesystemMaintenance,
    /// Scrub a btrfs root.
    FilesystemCheck,
    /// Grow the root partition on next boot.
    FilesystemExpand,
    /// Report files that differ from their packages.
    PackagesIntegrity,
    /// Toggle the pipewire CPU quota override.
    PipewireFix,
    /// Toggle the `bredos-wol` package.
    WakeOnLan,
    /// Install the recommended desktop applications.
    InstallRecommends,
    /// Install and enable Docker.
    InstallDocker,
    /// Install Steam with generic libraries.
    InstallSteamAny,
    /// Install Steam with RK3588 Panfork libraries.
    InstallSteamPanfork,
    /// Install the BredOS development toolchain.
    InstallDevelopment,
    /// Remove a stale pacman database lock.
    UnlockPacman,
    /// Remove orphaned packages until none remain.
    Autoremove,
    /// Show host details.
    SystemInfo,
}

impl ActionId {
    /// Every action, in catalogue order.
    pub const ALL: [Self; 14] = [
        Self::FilesystemMaintenance,
        Self::FilesystemCheck,
        Self::FilesystemExpand,
        Self::PackagesIntegrity,
        Self::PipewireFix,
        Self::WakeOnLan,
        Self::InstallRecommends,
        Self::InstallDocker,
        Self::InstallSteamAny,
        Self::InstallSteamPanfork,
        Self::InstallDevelopment,
        Self::UnlockPacman,
        Self::Autoremove,
        Self::SystemInfo,
    ];

    /// Screen heading shown while the action runs.
    pub fn title(self) -> &'static str {
        match self {
            Self::FilesystemMaintenance => "Filesystem Maintenance",
            Self::FilesystemCheck => "Filesystem Check",
            Self::FilesystemExpand => "Filesystem Resize",
            Self::PackagesIntegrity => "Check Packages Integrity",
            Self::PipewireFix => "Pipewire CPU fix",
            Self::WakeOnLan => "Wake On Lan",
            Self::InstallRecommends => "Install Recommended Packages",
            Self::InstallDocker => "Install Docker",
            Self::InstallSteamAny => "Install Steam (Any)",
            Self::InstallSteamPanfork => "Install Steam (RK3588, Panfork graphics)",
            Self::InstallDevelopment => "Install BredOS Development Packages",
            Self::UnlockPacman => "Unlock Pacman Database",
            Self::Autoremove => "Remove Unused Packages",
            Self::SystemInfo => "System Info",
        }
    }

    /// CLI words that invoke this action.
    pub fn cli_path(self) -> &'static [&'static str] {
        match self {
            Self::FilesystemMaintenance => &["health", "maintenance"],
            Self::FilesystemCheck => &["health", "check"],
            Self::FilesystemExpand => &["health", "expand"],
            Self::PackagesIntegrity => &["packages", "integrity"],
            Self::PipewireFix => &["tweaks", "pipewire"],
            Self::WakeOnLan => &["tweaks", "wol"],
            Self::InstallRecommends => &["packages", "install", "recommends"],
            Self::InstallDocker => &["packages", "install", "docker"],
            Self::InstallSteamAny => &["packages", "install", "steam-any"],
            Self::InstallSteamPanfork => &["packages", "install", "steam-panfork"],
            Self::InstallDevelopment => &["packages", "install", "development"],
            Self::UnlockPacman => &["packages", "unlock"],
            Self::Autoremove => &["packages", "autoremove"],
            Self::SystemInfo => &["info"],
        }
    }

    /// Full definition of this action.
    pub fn action(self) -> Action {
        let operation = match self {
            Self::FilesystemMaintenance => root_shell("sh", FS_MAINTENANCE_SCRIPT),
            Self::FilesystemCheck => root_shell("sh", FS_CHECK_SCRIPT),
            Self::FilesystemExpand => root_shell("sh", FS_EXPAND_SCRIPT),
            Self::PackagesIntegrity => Operation::Shell {
                command: CommandSpec::shell("sh", INTEGRITY_SCRIPT),
                elevate: false,
            },
            Self::PipewireFix => Operation::PipewireFix,
            Self::WakeOnLan => root_shell("bash", WOL_SCRIPT),
            Self::InstallRecommends => {
                root_shell("sh", pacman_install_script(RECOMMENDED_PACKAGES))
            }
            Self::InstallDocker => root_shell(
                "sh",
                pacman_install_script(DOCKER_PACKAGES) + DOCKER_SERVICES_SCRIPT,
            ),
            Self::InstallSteamAny => root_shell("sh", pacman_install_script(STEAM_ANY_PACKAGES)),
            Self::InstallSteamPanfork => {
                root_shell("sh", pacman_install_script(STEAM_PANFORK_PACKAGES))
            }
            Self::InstallDevelopment => {
                root_shell("sh", pacman_install_script(DEVELOPMENT_PACKAGES))
            }
            Self::UnlockPacman => root_shell("bash", UNLOCK_SCRIPT),
            Self::Autoremove => root_shell("bash", AUTOREMOVE_SCRIPT),
            Self::SystemInfo => Operation::SystemInfo,
        };

        Action {
            id: self,
            title: self.title(),
            operation,
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

fn root_shell(interpreter: &str, script: impl Into<String>) -> Operation {
    Operation::Shell {
        command: CommandSpec::shell(interpreter, script),
        elevate: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_titles_unique() {
        let titles: HashSet<_> = ActionId::ALL.iter().map(|a| a.title()).collect();
        assert_eq!(titles.len(), ActionId::ALL.len());
    }

    #[test]
    fn test_cli_paths_unique() {
        let paths: HashSet<_> = ActionId::ALL.iter().map(|a| a.cli_path()).collect();
        assert_eq!(paths.len(), ActionId::ALL.len());
    }

    #[test]
    fn test_shell_actions_use_dash_c() {
        for id in ActionId::ALL {
            if let Operation::Shell { command, .. } = id.action().operation {
                assert!(
                    command.program == "sh" || command.program == "bash",
                    "{id} uses {}",
                    command.program
                );
                assert_eq!(command.args.len(), 2);
                assert_eq!(command.args[0], "-c");
            }
        }
    }

    #[test]
    fn test_only_integrity_runs_unprivileged() {
        for id in ActionId::ALL {
            if let Operation::Shell { elevate, .. } = id.action().operation {
                assert_eq!(elevate, id != ActionId::PackagesIntegrity, "{id}");
            }
        }
    }

    #[test]
    fn test_package_lists_have_no_duplicates() {
        for list in [
            RECOMMENDED_PACKAGES,
            DOCKER_PACKAGES,
            STEAM_ANY_PACKAGES,
            STEAM_PANFORK_PACKAGES,
            DEVELOPMENT_PACKAGES,
        ] {
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len());
        }
    }

    #[test]
    fn test_pacman_install_script() {
        assert_eq!(
            pacman_install_script(&["steam", "steam-libs-any"]),
            "pacman -Sy && pacman -S --noconfirm --needed steam steam-libs-any"
        );
    }

    #[test]
    fn test_docker_enables_service() {
        let Operation::Shell { command, .. } = ActionId::InstallDocker.action().operation else {
            panic!("docker should be a shell action");
        };
        assert!(command.args[1].contains("docker-buildx"));
        assert!(command.args[1].ends_with("systemctl enable --now docker"));
    }

    #[test]
    fn test_elevated_prefixes_pkexec() {
        let cmd = CommandSpec::shell("sh", "echo hi");
        let elevated = cmd.elevated();
        assert_eq!(elevated.program, "pkexec");
        assert_eq!(elevated.args, vec!["sh", "-c", "echo hi"]);
        assert_eq!(elevated.display(), "pkexec sh -c echo hi");
        assert_eq!(cmd.to_string(), "sh -c echo hi");
    }
}
