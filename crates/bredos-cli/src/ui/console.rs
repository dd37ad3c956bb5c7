//! Line-oriented output for subcommands.

use super::theme::Theme;
use bredos_core::{Reporter, RunOutcome};
use crossterm::style::Stylize;
use std::io::Write;

/// Streams command output straight to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    theme: Theme,
}

impl ConsoleReporter {
    /// A reporter using the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Print the lines of a native operation's result.
    pub fn message(&self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    /// Print the closing status of a command run.
    pub fn finished(&self, outcome: &RunOutcome) {
        let label = outcome.status_label();
        let styled = match outcome {
            RunOutcome::Aborted => label.with(self.theme.colors.warning),
            _ if outcome.is_success() => label.with(self.theme.colors.success),
            _ => label.with(self.theme.colors.error),
        };
        println!();
        println!("{}", styled.bold());
        let _ = std::io::stdout().flush();
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        println!("{}", title.bold());
    }

    fn command(&self, display: &str, elevated: bool) {
        println!("{}", prompt_line(display, elevated).with(self.theme.colors.secondary));
    }

    fn line(&self, text: &str) {
        println!("{text}");
    }

    fn warning(&self, msg: &str) {
        eprintln!(
            "  {} {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            msg
        );
    }
}

/// `$ cmd` for user commands, `# cmd` for ones that run as root.
pub fn prompt_line(display: &str, elevated: bool) -> String {
    let prompt = if elevated { '#' } else { '$' };
    format!("{prompt} {display}")
}
