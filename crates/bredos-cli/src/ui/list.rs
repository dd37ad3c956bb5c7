//! Action listing for `bredos-config list`

use super::theme::Theme;
use bredos_core::ActionId;
use crossterm::style::Stylize;

/// Column headers.
pub fn header(theme: &Theme) -> String {
    format!(
        "  {:<tw$} {}",
        "action",
        "command",
        tw = theme.layout.title_width
    )
}

/// One action row, unstyled: padded title, then the invocation.
pub fn row(theme: &Theme, id: ActionId) -> (String, String) {
    let title = format!("{:<width$}", id.title(), width = theme.layout.title_width);
    let command = format!("bredos-config {}", id.cli_path().join(" "));
    (title, command)
}

/// Print the whole catalogue.
pub fn print_actions(theme: &Theme) {
    println!();
    println!("{}", header(theme).dark_grey());
    for id in ActionId::ALL {
        let (title, command) = row(theme, id);
        println!(
            "  {} {}",
            title.with(theme.colors.title),
            command.with(theme.colors.secondary)
        );
    }
    println!();
    println!(
        "{}",
        format!("  {} actions", ActionId::ALL.len()).dark_grey()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row() {
        let theme = Theme::default();
        let (title, command) = row(&theme, ActionId::InstallDocker);
        assert!(title.starts_with("Install Docker "));
        assert_eq!(title.len(), theme.layout.title_width);
        assert_eq!(command, "bredos-config packages install docker");
    }

    #[test]
    fn test_titles_fit_column() {
        let theme = Theme::default();
        for id in ActionId::ALL {
            assert!(id.title().len() <= theme.layout.title_width, "{id}");
        }
    }

    #[test]
    fn test_header_columns() {
        let header = header(&Theme::default());
        assert!(header.trim_start().starts_with("action"));
        assert!(header.ends_with("command"));
    }
}
