//! Main analyze command — wires discovery, the semantic model, and the
//! traversal together, then hands the graph to an output sink.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use varsight_core::{InsightAnalyzer, Position};

use crate::output;
use crate::OutputFormat;

pub fn run(
    file: &Path,
    line: u32,
    column: u32,
    root: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<i32> {
    let root = root.unwrap_or_else(|| Path::new("."));
    let (model, config, load_errors) = super::load_model(root)?;

    let format = format.unwrap_or(match config.output.format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Terminal,
    });
    if !config.output.color {
        colored::control::set_override(false);
    }

    if format == OutputFormat::Terminal {
        for error in &load_errors {
            eprintln!("  {} {}", "skipped".yellow(), error);
        }
    }

    let analyzer = InsightAnalyzer::with_max_depth(&model, config.analysis.max_depth);
    match analyzer.analyze(file, Position::new(line, column)) {
        Some(graph) => {
            match format {
                OutputFormat::Terminal => output::terminal::print_graph(&graph),
                OutputFormat::Json => println!("{}", output::json::render(&graph)?),
            }
            Ok(0)
        }
        None => {
            eprintln!(
                "{}",
                format!(
                    "no analyzable symbol at {}:{}:{}",
                    file.display(),
                    line,
                    column
                )
                .red()
            );
            Ok(1)
        }
    }
}
