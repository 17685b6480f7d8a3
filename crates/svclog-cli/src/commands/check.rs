//! Check command implementation

use std::path::Path;

use colored::Colorize;
use svclog::{ConfigResolver, LoggerFactory};

use crate::error::Result;

/// Run the check command
///
/// Resolution and construction both have to succeed; the logger built here
/// is flushed and dropped.
pub fn run_check(hint: &Path, json: bool) -> Result<()> {
    let resolver = ConfigResolver::new(hint);
    let resolved = resolver.resolve_with_sources()?;
    let logger = LoggerFactory::build(resolved.descriptor.clone())?;
    logger.flush()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!("{}", "Logger Configuration".bold());
    println!();
    println!("{}:   {}", "Directory".dimmed(), resolver.paths().dir());
    println!("{}:", "Sources".dimmed());
    for source in &resolved.sources {
        println!("  {} {}", "+".green(), source);
    }
    if !resolver.has_override() {
        println!(
            "  {} {} (not present)",
            "-".dimmed(),
            resolver.paths().override_file().as_str().dimmed()
        );
    }
    println!();
    print!("{}", serde_yaml::to_string(&resolved.descriptor)?);
    println!();
    println!("{} logger builds at level {}", "OK".green().bold(), logger.level());

    Ok(())
}
