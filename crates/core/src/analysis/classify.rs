//! Symbol classification and node identity.
//!
//! Node Ids are composite — qualified display string plus `basename:line` —
//! so overloads, same-named overrides, and same-named parameters on
//! different methods all materialize as distinct nodes.

use crate::graph::{InsightNode, InsightNodeKind, NodeLocation};
use crate::semantic::{SemanticModel, SourceLocation, SymbolId, SymbolKind};

/// Map a symbol kind onto its graph node kind.
pub fn node_kind(kind: SymbolKind) -> InsightNodeKind {
    match kind {
        SymbolKind::Local => InsightNodeKind::Variable,
        SymbolKind::Parameter => InsightNodeKind::Parameter,
        SymbolKind::Field => InsightNodeKind::Field,
        SymbolKind::Property => InsightNodeKind::Property,
        SymbolKind::Method => InsightNodeKind::Method,
    }
}

/// Composite node identity for a symbol.
pub fn node_id(model: &SemanticModel, sym: SymbolId) -> String {
    let location = model.location(sym);
    format!(
        "{}@{}",
        model.display_string(sym),
        model.location_string(&location)
    )
}

/// Resolve a [`SourceLocation`] into the path-bearing location nodes carry.
pub fn node_location(model: &SemanticModel, location: &SourceLocation) -> NodeLocation {
    NodeLocation::new(
        model.file_path(location.file).to_path_buf(),
        location.line,
        location.column,
    )
}

/// Build the graph node for a symbol.
pub fn materialize(model: &SemanticModel, sym: SymbolId) -> InsightNode {
    let symbol = model.symbol(sym);
    let location = model.location(sym);
    let excerpt = model.source_line(&location);
    InsightNode::new(
        node_id(model, sym),
        symbol.name().to_string(),
        symbol.type_name().unwrap_or_default().to_string(),
        node_kind(symbol.kind()),
        node_location(model, &location),
        excerpt,
    )
}
