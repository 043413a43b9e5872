//! JSON output: the graph in the driver API shape, for downstream
//! renderers.

use anyhow::Result;
use serde::Serialize;
use varsight_core::InsightGraph;

#[derive(Debug, Serialize)]
pub struct JsonGraph {
    pub root: String,
    pub total_references: usize,
    pub nodes: Vec<JsonNode>,
}

#[derive(Debug, Serialize)]
pub struct JsonNode {
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(rename = "type")]
    pub type_string: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub source_excerpt: String,
    pub edges: Vec<JsonEdge>,
}

#[derive(Debug, Serialize)]
pub struct JsonEdge {
    /// Id of the target node
    pub target: String,
    pub relation: String,
    pub origin: JsonLocation,
}

#[derive(Debug, Serialize)]
pub struct JsonLocation {
    pub file: String,
    pub line: u32,
}

pub fn render(graph: &InsightGraph) -> Result<String> {
    let root_id = graph
        .node(graph.root())
        .map(|n| n.id().to_string())
        .unwrap_or_default();

    let nodes = graph
        .nodes()
        .map(|(node_id, node)| JsonNode {
            id: node.id().to_string(),
            name: node.name().to_string(),
            kind: node.kind().label().to_string(),
            type_string: node.type_string().to_string(),
            file: node.location().file.display().to_string(),
            line: node.location().line,
            column: node.location().column,
            source_excerpt: node.source_excerpt().to_string(),
            edges: graph
                .edges_from(node_id)
                .into_iter()
                .filter_map(|(target, edge)| {
                    graph.node(target).map(|t| JsonEdge {
                        target: t.id().to_string(),
                        relation: edge.relation().label().to_string(),
                        origin: JsonLocation {
                            file: edge.origin().file.display().to_string(),
                            line: edge.origin().line,
                        },
                    })
                })
                .collect(),
        })
        .collect();

    Ok(serde_json::to_string_pretty(&JsonGraph {
        root: root_id,
        total_references: graph.total_references(),
        nodes,
    })?)
}
