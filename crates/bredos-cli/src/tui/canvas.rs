//! Canvas - bordered full-screen window
//!
//! Commands are queued and only reach the terminal on [`Canvas::flush`],
//! so each frame is rendered in one write.

use crate::ui::Theme;
use crossterm::{
    QueueableCommand, cursor,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{Result, Stdout, Write, stdout};

/// How a piece of text is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Plain,
    /// Bold and underlined window heading.
    Title,
    /// Secondary information such as the command being run.
    Dim,
    /// Inverted colours: menu selection and prompts.
    Reversed,
}

pub struct Canvas {
    stdout: Stdout,
    accent: Color,
    secondary: Color,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas").finish_non_exhaustive()
    }
}

impl Canvas {
    pub fn new(theme: &Theme) -> Self {
        Self {
            stdout: stdout(),
            accent: theme.colors.accent,
            secondary: theme.colors.secondary,
        }
    }

    /// Terminal size as (columns, rows).
    pub fn size(&self) -> (u16, u16) {
        terminal::size().unwrap_or((80, 24))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.stdout.queue(Clear(ClearType::All))?;
        Ok(())
    }

    /// Draw the window frame along the terminal edges.
    pub fn border(&mut self) -> Result<()> {
        let (w, h) = self.size();
        if w < 2 || h < 2 {
            return Ok(());
        }
        let inner = "─".repeat(usize::from(w - 2));

        self.stdout.queue(SetForegroundColor(self.accent))?;
        self.stdout.queue(cursor::MoveTo(0, 0))?;
        self.stdout.queue(Print(format!("┌{inner}┐")))?;
        for row in 1..h - 1 {
            self.stdout.queue(cursor::MoveTo(0, row))?;
            self.stdout.queue(Print("│"))?;
            self.stdout.queue(cursor::MoveTo(w - 1, row))?;
            self.stdout.queue(Print("│"))?;
        }
        self.stdout.queue(cursor::MoveTo(0, h - 1))?;
        self.stdout.queue(Print(format!("└{inner}┘")))?;
        self.stdout.queue(SetForegroundColor(Color::Reset))?;
        Ok(())
    }

    /// Blank the inside of `row`, leaving the frame intact.
    pub fn clear_row(&mut self, row: u16) -> Result<()> {
        let (w, h) = self.size();
        if w < 2 || row == 0 || row >= h.saturating_sub(1) {
            return Ok(());
        }
        self.stdout.queue(cursor::MoveTo(1, row))?;
        self.stdout.queue(Print(" ".repeat(usize::from(w - 2))))?;
        Ok(())
    }

    /// Write `text` at (`row`, `col`), clipped to the inside of the frame.
    pub fn write_at(&mut self, row: u16, col: u16, text: &str, style: TextStyle) -> Result<()> {
        let (w, h) = self.size();
        if row == 0 || row >= h.saturating_sub(1) || col >= w.saturating_sub(1) {
            return Ok(());
        }
        let text = fit(text, usize::from(w - 1 - col));

        let color = if style == TextStyle::Dim {
            self.secondary
        } else {
            self.accent
        };
        self.stdout.queue(cursor::MoveTo(col, row))?;
        self.stdout.queue(SetForegroundColor(color))?;
        match style {
            TextStyle::Title => {
                self.stdout.queue(SetAttribute(Attribute::Bold))?;
                self.stdout.queue(SetAttribute(Attribute::Underlined))?;
            }
            TextStyle::Reversed => {
                self.stdout.queue(SetAttribute(Attribute::Reverse))?;
            }
            TextStyle::Plain | TextStyle::Dim => {}
        }
        self.stdout.queue(Print(text))?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(SetForegroundColor(Color::Reset))?;
        Ok(())
    }

    /// Flush all queued commands to terminal (atomic render)
    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()
    }
}

/// Clip `text` to at most `max` characters.
pub fn fit(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Make command output safe to position on screen: tabs become spaces and
/// other control characters (escape sequences, carriage returns) are dropped.
pub fn sanitize(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '\t' {
            out.push_str("    ");
        } else if !c.is_control() {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("hello", 3), "hel");
        assert_eq!(fit("hi", 10), "hi");
        assert_eq!(fit("über", 2), "üb");
        assert_eq!(fit("x", 0), "");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a\tb"), "a    b");
        assert_eq!(sanitize("progress\r"), "progress");
        assert_eq!(sanitize("\u{1b}[1mbold"), "[1mbold");
        assert_eq!(sanitize("plain text"), "plain text");
    }
}
