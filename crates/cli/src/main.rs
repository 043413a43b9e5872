//! Varsight CLI - variable insight for C#

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "varsight")]
#[command(about = "Trace what influences a C# variable", long_about = None)]
#[command(version = varsight_core::VERSION)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the symbol at a cursor position
    Analyze {
        /// File containing the selection (absolute, or relative to the root)
        file: PathBuf,

        /// 1-based line of the selection
        #[arg(long)]
        line: u32,

        /// 1-based column of the selection
        #[arg(long)]
        column: u32,

        /// Workspace root (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List analyzable symbols in the workspace
    Symbols {
        /// Workspace root (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Only list symbols declared in this file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Initialize .varsight.toml configuration
    Init {
        /// Directory to place the config in (default: current directory)
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Terminal,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            file,
            line,
            column,
            root,
            format,
        } => commands::analyze::run(&file, line, column, root.as_deref(), format),
        Commands::Symbols { root, file } => commands::symbols::run(root.as_deref(), file.as_deref()),
        Commands::Init { path } => commands::init::run(path.as_deref()),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(2);
        }
    }
}
