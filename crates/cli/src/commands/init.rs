//! Initialize .varsight.toml configuration

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use varsight_core::VarsightConfig;

pub fn run(path: Option<&Path>) -> Result<i32> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(".varsight.toml");

    if config_path.exists() {
        println!(
            "{} .varsight.toml already exists at {}",
            "!".yellow(),
            config_path.display()
        );
        return Ok(0);
    }

    let config = VarsightConfig::default();
    config.save(&config_path)?;

    println!(
        "{} Created .varsight.toml at {}",
        "✓".green(),
        config_path.display()
    );
    println!("\nYou can now customize the configuration and run:");
    println!("  varsight analyze <file> --line <n> --column <n>");

    Ok(0)
}
