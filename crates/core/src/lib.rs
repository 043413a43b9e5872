//! Varsight Core - Variable Insight Engine
//!
//! This crate provides the analysis infrastructure for varsight:
//! - C# parsing via Tree-sitter and workspace loading
//! - A semantic model: symbols, binding, references, type hierarchies
//! - Backward data-flow traversal from a selected symbol
//! - The resulting insight graph of influencing symbols

pub mod analysis;
pub mod cancel;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod semantic;
pub mod syntax;
pub mod workspace;

pub use analysis::{InsightAnalyzer, MAX_DEPTH};
pub use cancel::CancellationToken;
pub use config::VarsightConfig;
pub use discovery::discover_files;
pub use graph::{
    InsightEdge, InsightGraph, InsightNode, InsightNodeKind, NodeId, NodeLocation, Relation,
};
pub use semantic::{SemanticModel, SourceLocation, Symbol, SymbolId, SymbolKind};
pub use workspace::{Document, FileId, Position, Workspace, WorkspaceError};

/// Varsight version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
