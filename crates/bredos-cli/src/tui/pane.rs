//! Scrolling output pane for commands run from the menu.

use super::canvas::{Canvas, TextStyle, sanitize};
use crate::ui::Theme;
use crate::ui::console::prompt_line;
use bredos_core::Reporter;
use std::io::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Rows reserved below the output: the prompt row and the bottom border.
const FOOTER_ROWS: u16 = 2;

/// Number of output rows that fit between `first_row` and the footer.
pub fn capacity(rows: u16, first_row: u16) -> usize {
    usize::from(rows.saturating_sub(FOOTER_ROWS).saturating_sub(first_row))
}

/// The tail of `lines` that fits in `capacity` rows.
pub fn visible(lines: &[String], capacity: usize) -> &[String] {
    &lines[lines.len().saturating_sub(capacity)..]
}

struct Pane {
    canvas: Canvas,
    theme: Theme,
    lines: Vec<String>,
    first_row: u16,
}

impl Pane {
    fn header(&mut self, title: &str) -> Result<()> {
        self.lines.clear();
        self.first_row = self.theme.layout.body_row;
        self.canvas.clear()?;
        self.canvas.border()?;
        self.canvas.write_at(
            self.theme.layout.title_row,
            self.theme.layout.text_col,
            title,
            TextStyle::Title,
        )?;
        self.canvas.flush()
    }

    fn command(&mut self, display: &str, elevated: bool) -> Result<()> {
        self.canvas.write_at(
            self.theme.layout.body_row,
            self.theme.layout.text_col,
            &prompt_line(display, elevated),
            TextStyle::Dim,
        )?;
        self.first_row = self.theme.layout.body_row + 2;
        self.canvas.flush()
    }

    fn push(&mut self, text: &str) -> Result<()> {
        self.lines.push(sanitize(text));

        let (_, rows) = self.canvas.size();
        let cap = capacity(rows, self.first_row);
        if cap == 0 {
            return Ok(());
        }

        let col = self.theme.layout.text_col;
        if self.lines.len() <= cap {
            let row = self.first_row + (self.lines.len() - 1) as u16;
            let line = self.lines[self.lines.len() - 1].clone();
            self.canvas.write_at(row, col, &line, TextStyle::Plain)?;
        } else {
            let window: Vec<String> = visible(&self.lines, cap).to_vec();
            for (offset, line) in window.iter().enumerate() {
                let row = self.first_row + offset as u16;
                self.canvas.clear_row(row)?;
                self.canvas.write_at(row, col, line, TextStyle::Plain)?;
            }
        }
        self.canvas.border()?;
        self.canvas.flush()
    }
}

/// Draws reporter output into the full-screen window.
///
/// Terminal write errors are ignored here; the menu loop surfaces them on
/// its next draw.
pub struct PaneReporter {
    pane: Mutex<Pane>,
}

impl std::fmt::Debug for PaneReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneReporter").finish_non_exhaustive()
    }
}

impl PaneReporter {
    pub fn new(theme: &Theme) -> Self {
        Self {
            pane: Mutex::new(Pane {
                canvas: Canvas::new(theme),
                theme: theme.clone(),
                lines: Vec::new(),
                first_row: theme.layout.body_row,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pane> {
        self.pane.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Reporter for PaneReporter {
    fn section(&self, title: &str) {
        let _ = self.lock().header(title);
    }

    fn command(&self, display: &str, elevated: bool) {
        let _ = self.lock().command(display, elevated);
    }

    fn line(&self, text: &str) {
        let _ = self.lock().push(text);
    }

    fn warning(&self, msg: &str) {
        let mut pane = self.lock();
        let icon = pane.theme.icons.warning;
        let _ = pane.push(&format!("{icon} {msg}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_capacity() {
        // 24 rows: output from row 5 up to row 21; row 22 prompt, row 23 border.
        assert_eq!(capacity(24, 5), 17);
        assert_eq!(capacity(4, 5), 0);
    }

    #[test]
    fn test_visible_shows_tail() {
        let all = lines(10);
        assert_eq!(visible(&all, 3), &all[7..]);
        assert_eq!(visible(&all, 20), &all[..]);
        assert!(visible(&all, 0).is_empty());
    }
}
