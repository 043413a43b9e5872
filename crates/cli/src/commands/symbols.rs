//! List the analyzable symbols in a workspace, so a cursor position can be
//! picked without an IDE.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(root: Option<&Path>, file: Option<&Path>) -> Result<i32> {
    let root = root.unwrap_or_else(|| Path::new("."));
    let (model, _config, load_errors) = super::load_model(root)?;

    for error in &load_errors {
        eprintln!("  {} {}", "skipped".yellow(), error);
    }

    let mut count = 0;
    for (id, symbol) in model.table().symbols() {
        if let Some(filter) = file {
            let path = model.file_path(symbol.file());
            if path != filter && !path.ends_with(filter) {
                continue;
            }
        }
        let location = model.location(id);
        println!(
            "{:<10} {:<40} {}",
            symbol.kind().label().cyan(),
            model.display_string(id),
            model.location_string(&location).dimmed()
        );
        count += 1;
    }

    eprintln!();
    eprintln!("  {} symbol(s)", count);
    Ok(0)
}
