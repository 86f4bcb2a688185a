//! Tool listing command

use anyhow::Result;
use colored::Colorize;
use gaia_core::ToolRegistry;

/// Print every registered tool with its call signature
pub fn tools_command() -> Result<()> {
    let registry = ToolRegistry::default();

    println!("{}", "Available tools:".bold());
    for line in registry.signatures() {
        let (signature, description) = line.split_once(" - ").unwrap_or((line.as_str(), ""));
        println!("  {}  {}", signature.green(), description.dimmed());
    }
    Ok(())
}
