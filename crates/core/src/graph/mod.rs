//! Insight graph data structures and operations

pub mod edges;
pub mod nodes;

pub use edges::{InsightEdge, Relation};
pub use nodes::{InsightNode, InsightNodeKind, NodeLocation};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Unique identifier for a node in the insight graph
pub type NodeId = NodeIndex;

/// The result of one analysis invocation: a directed graph whose root is the
/// selected symbol and whose edges point at the symbols that influence it.
///
/// Nodes live in an arena addressed by [`NodeId`]; deduplication is by the
/// node's composite string Id, edge deduplication by the
/// `(source, target, relation)` triple.
pub struct InsightGraph {
    /// The underlying directed graph
    graph: DiGraph<InsightNode, InsightEdge>,

    /// The selected symbol's node
    root: NodeId,

    /// Index for node deduplication by composite Id
    id_index: HashMap<String, NodeId>,

    /// Number of nodes reachable from the root, excluding the root itself
    total_references: usize,
}

impl InsightGraph {
    /// Create a graph containing only the root node.
    pub fn new(root: InsightNode) -> Self {
        let mut graph = DiGraph::new();
        let mut id_index = HashMap::new();
        let id = root.id().to_string();
        let root_idx = graph.add_node(root);
        id_index.insert(id, root_idx);
        Self {
            graph,
            root: root_idx,
            id_index,
            total_references: 0,
        }
    }

    /// Add a node, or return the existing node with the same Id.
    pub fn intern(&mut self, node: InsightNode) -> NodeId {
        if let Some(&existing) = self.id_index.get(node.id()) {
            return existing;
        }
        let id = node.id().to_string();
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    /// Add an edge unless an edge with the same `(source, target, relation)`
    /// already exists. Returns whether the edge was inserted.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, edge: InsightEdge) -> bool {
        let duplicate = self
            .graph
            .edges_connecting(from, to)
            .any(|e| e.weight().relation() == edge.relation());
        if duplicate {
            return false;
        }
        self.graph.add_edge(from, to, edge);
        true
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&InsightNode> {
        self.graph.node_weight(id)
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &InsightNode)> {
        self.graph
            .node_indices()
            .map(move |id| (id, &self.graph[id]))
    }

    /// Outgoing edges of a node, in insertion order.
    pub fn edges_from(&self, node: NodeId) -> Vec<(NodeId, &InsightEdge)> {
        // petgraph iterates adjacency lists most-recent first
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .map(|e| (e.target(), e.weight()))
            .collect();
        edges.reverse();
        edges
    }

    /// Find a node by its composite Id.
    pub fn node_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of influencing symbols discovered (node count minus the root).
    pub fn total_references(&self) -> usize {
        self.total_references
    }

    pub(crate) fn set_total_references(&mut self, total: usize) {
        self.total_references = total;
    }
}
