//! List command

use crate::ui::{Theme, list};

/// Print every action and the subcommand that runs it
pub fn list() {
    list::print_actions(&Theme::default());
}
