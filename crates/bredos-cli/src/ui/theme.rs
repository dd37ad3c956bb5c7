//! UI Theme - Design system constants
//!
//! Colours, icons and window geometry shared by the line-oriented output
//! and the full-screen menu.

use crossterm::style::Color;

/// Default theme for bredos-config
#[derive(Debug, Clone)]
pub struct Theme {
    /// Colors for different UI elements
    pub colors: ColorScheme,
    /// Status icons
    pub icons: Icons,
    /// Window layout constants
    pub layout: Layout,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ColorScheme::default(),
            icons: Icons::default(),
            layout: Layout::default(),
        }
    }
}

/// Color scheme for UI elements
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Window border and background accent (BredOS orange)
    pub accent: Color,
    /// Action titles in listings
    pub title: Color,
    /// Commands and secondary info
    pub secondary: Color,
    /// Success states
    pub success: Color,
    /// Warning states
    pub warning: Color,
    /// Error states
    pub error: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            accent: Color::AnsiValue(166),
            title: Color::Cyan,
            secondary: Color::DarkGrey,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

/// Status icons for different states
#[derive(Debug, Clone)]
pub struct Icons {
    /// Warning state (⚠)
    pub warning: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self { warning: "⚠" }
    }
}

/// Full-screen window geometry
#[derive(Debug, Clone)]
pub struct Layout {
    /// Row of the window title
    pub title_row: u16,
    /// First row of menu items and output
    pub body_row: u16,
    /// Left margin for titles and output
    pub text_col: u16,
    /// Left margin for menu items
    pub item_col: u16,
    /// Width allocated for the action title column in `list`
    pub title_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title_row: 1,
            body_row: 3,
            text_col: 2,
            item_col: 4,
            title_width: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.colors.accent, Color::AnsiValue(166));
        assert_eq!(theme.icons.warning, "⚠");
        assert_eq!(theme.layout.body_row, 3);
        assert!(theme.layout.item_col > theme.layout.text_col);
    }
}
