//! Info command

use anyhow::{Context, Result};
use bredos_core::Session;
use crate::ui::ConsoleReporter;

/// Show board, kernel and tool information
pub fn info(session: &Session, json: bool) -> Result<()> {
    let info = session.system_info();
    if json {
        let out = serde_json::to_string_pretty(&info).context("Failed to encode system info")?;
        println!("{out}");
    } else {
        ConsoleReporter::new().message(&info.lines());
    }
    Ok(())
}
