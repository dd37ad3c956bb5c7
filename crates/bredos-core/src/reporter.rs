//! Reporter trait for dependency injection
//!
//! This trait allows the runner to stream command output and status without
//! being coupled to the line-oriented CLI or the full-screen TUI.

/// Receives everything an action wants to show the user.
pub trait Reporter: Send + Sync {
    /// A new action has started; `title` is its screen heading.
    fn section(&self, title: &str);

    /// The command about to run. `elevated` is true when it runs as root.
    fn command(&self, display: &str, elevated: bool);

    /// One line of command output, without the trailing newline.
    fn line(&self, text: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);
}

/// A no-op reporter for silent operations (e.g., probing, testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn command(&self, _: &str, _: bool) {}
    fn line(&self, _: &str) {}
    fn warning(&self, _: &str) {}
}
