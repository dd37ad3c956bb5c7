//! Menu tree for the interactive front end.

use crate::action::ActionId;

/// Application name, also the main menu title.
pub const APP_NAME: &str = "BredOS Configurator";

/// Identifies one screen of the menu tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuId {
    /// Top level.
    Main,
    /// Filesystem upkeep and integrity.
    SystemHealth,
    /// Small user and system tweaks.
    SystemTweaks,
    /// Package sets and pacman housekeeping.
    Packages,
}

/// What selecting a menu item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Descend into another menu.
    Open(MenuId),
    /// Perform an action, then return to this menu.
    Run(ActionId),
    /// Leave this menu (exit the program from the main menu).
    Back,
}

/// One selectable line of a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    /// Text shown in the list.
    pub label: &'static str,
    /// What selecting it does.
    pub entry: Entry,
}

/// A titled list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    /// Window title.
    pub title: &'static str,
    /// Items in display order.
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Item labels in display order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.items.iter().map(|i| i.label).collect()
    }

    /// Entry behind the item at `index`; out-of-range indices behave as `Back`.
    pub fn entry(&self, index: usize) -> Entry {
        self.items.get(index).map_or(Entry::Back, |i| i.entry)
    }
}

const fn item(label: &'static str, entry: Entry) -> MenuItem {
    MenuItem { label, entry }
}

impl MenuId {
    /// Layout of this menu.
    pub fn menu(self) -> Menu {
        let (title, items) = match self {
            Self::Main => (
                APP_NAME,
                vec![
                    item("System Health", Entry::Open(Self::SystemHealth)),
                    item("System Tweaks", Entry::Open(Self::SystemTweaks)),
                    item("Packages", Entry::Open(Self::Packages)),
                    item("System Info", Entry::Run(ActionId::SystemInfo)),
                    item("Exit", Entry::Back),
                ],
            ),
            Self::SystemHealth => (
                "Filesystem",
                vec![
                    item(
                        "Perform Filesystem Maintenance",
                        Entry::Run(ActionId::FilesystemMaintenance),
                    ),
                    item(
                        "Check & Repair Filesystem",
                        Entry::Run(ActionId::FilesystemCheck),
                    ),
                    item("Expand Filesystem", Entry::Run(ActionId::FilesystemExpand)),
                    item(
                        "Check Packages Integrity",
                        Entry::Run(ActionId::PackagesIntegrity),
                    ),
                    item("Main Menu", Entry::Back),
                ],
            ),
            Self::SystemTweaks => (
                "System Tweaks",
                vec![
                    item("Pipewire CPU fix", Entry::Run(ActionId::PipewireFix)),
                    item("Wake On Lan", Entry::Run(ActionId::WakeOnLan)),
                    item("Main Menu", Entry::Back),
                ],
            ),
            Self::Packages => (
                "Packages",
                vec![
                    item(
                        "Install Recommended Desktop Packages",
                        Entry::Run(ActionId::InstallRecommends),
                    ),
                    item("Install Docker", Entry::Run(ActionId::InstallDocker)),
                    item("Install Steam (Any)", Entry::Run(ActionId::InstallSteamAny)),
                    item(
                        "Install Steam (Panfork graphics)",
                        Entry::Run(ActionId::InstallSteamPanfork),
                    ),
                    item(
                        "Install BredOS Development Packages",
                        Entry::Run(ActionId::InstallDevelopment),
                    ),
                    item("Unlock Pacman Database", Entry::Run(ActionId::UnlockPacman)),
                    item("Autoremove Unused packages", Entry::Run(ActionId::Autoremove)),
                    item(
                        "Check Packages Integrity",
                        Entry::Run(ActionId::PackagesIntegrity),
                    ),
                    item("Main Menu", Entry::Back),
                ],
            ),
        };

        Menu { title, items }
    }
}

/// Selection state of a menu list. Moving past either end wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    selected: usize,
    len: usize,
}

impl Cursor {
    /// Cursor on the first of `len` items.
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Index of the highlighted item.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move to the previous item.
    pub fn up(&mut self) {
        if self.len == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            self.len - 1
        } else {
            self.selected - 1
        };
    }

    /// Move to the next item.
    pub fn down(&mut self) {
        if self.len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % self.len;
    }
}
