//! Backward data-flow traversal.
//!
//! The driver resolves the selected symbol, materializes its root node, and
//! expands backward: each frame asks the pass matching the symbol's kind for
//! contributors, writes nodes and edges into the graph, then recurses.
//! Termination is guaranteed by the visited set; the depth ceiling is a
//! safety bound on top of it for call-heavy pathological inputs.

pub mod assignments;
pub mod classify;
pub mod contributors;
pub mod initializers;
pub mod overrides;
pub mod params;
pub mod returns;

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::Path;

use crate::cancel::CancellationToken;
use crate::graph::{InsightEdge, InsightGraph, NodeId, NodeLocation, Relation};
use crate::semantic::{SemanticModel, SymbolId, SymbolKind};
use crate::workspace::{FileId, Position};

use assignments::write_sites;
use contributors::{rhs_contributors, InvocationMap};
use initializers::{trace_member_initializer, MemberTrace};
use overrides::sibling_overrides;
use params::map_parameter;
use returns::return_contributors;

/// Hard ceiling on expansion depth. The visited set alone guarantees
/// termination; the ceiling bounds frame depth in call-heavy code.
pub const MAX_DEPTH: u32 = 15;

/// One-shot analyzer over a built semantic model.
pub struct InsightAnalyzer<'a> {
    model: &'a SemanticModel,
    max_depth: u32,
}

impl<'a> InsightAnalyzer<'a> {
    pub fn new(model: &'a SemanticModel) -> Self {
        Self {
            model,
            max_depth: MAX_DEPTH,
        }
    }

    /// Use a smaller depth bound. Values above [`MAX_DEPTH`] are clamped.
    pub fn with_max_depth(model: &'a SemanticModel, max_depth: u32) -> Self {
        Self {
            model,
            max_depth: max_depth.min(MAX_DEPTH),
        }
    }

    /// Analyze the symbol at `position` in `file`.
    ///
    /// Returns `None` when the cursor does not resolve to an analyzable
    /// symbol (local, parameter, field, property, or method).
    pub fn analyze(&self, file: &Path, position: Position) -> Option<InsightGraph> {
        self.analyze_cancellable(file, position, &CancellationToken::new())
    }

    /// Like [`analyze`](Self::analyze), checking `token` between write sites
    /// and expansions. A cancelled analysis returns `None`; partial graphs
    /// are discarded.
    pub fn analyze_cancellable(
        &self,
        file: &Path,
        position: Position,
        token: &CancellationToken,
    ) -> Option<InsightGraph> {
        let workspace = self.model.workspace();
        let file_id = workspace.file_named(file)?;
        let offset = workspace.document(file_id).offset_at(position)?;
        let root_symbol = self.model.symbol_at(file_id, offset)?;

        let mut traversal = Traversal {
            model: self.model,
            graph: InsightGraph::new(classify::materialize(self.model, root_symbol)),
            visited: HashSet::new(),
            node_of: HashMap::new(),
            invocations: InvocationMap::new(),
            max_depth: self.max_depth,
            token,
        };
        let root_node = traversal.graph.root();
        traversal.node_of.insert(root_symbol, root_node);

        if traversal.expand(root_symbol, root_node, 0, false).is_err() {
            return None;
        }

        let total = traversal.graph.node_count() - 1;
        traversal.graph.set_total_references(total);
        Some(traversal.graph)
    }
}

struct Cancelled;

/// Invocation-scoped working state. Dropped once the graph is returned.
struct Traversal<'a> {
    model: &'a SemanticModel,
    graph: InsightGraph,
    /// Symbols whose outgoing expansion has been attempted
    visited: HashSet<SymbolId>,
    /// Symbol → node dedup; a symbol re-encountered in a different role
    /// still forms one node
    node_of: HashMap<SymbolId, NodeId>,
    invocations: InvocationMap,
    max_depth: u32,
    token: &'a CancellationToken,
}

impl Traversal<'_> {
    fn expand(
        &mut self,
        symbol: SymbolId,
        node: NodeId,
        depth: u32,
        in_override: bool,
    ) -> Result<(), Cancelled> {
        if self.token.is_cancelled() {
            return Err(Cancelled);
        }
        if depth > self.max_depth || !self.visited.insert(symbol) {
            return Ok(());
        }

        let (kind, is_static) = {
            let s = self.model.symbol(symbol);
            (s.kind(), s.is_static())
        };
        match kind {
            SymbolKind::Method => self.expand_method(symbol, node, depth, in_override),
            SymbolKind::Parameter => self.expand_parameter(symbol, node, depth),
            SymbolKind::Field | SymbolKind::Property if !is_static => {
                self.expand_instance_member(symbol, node, depth)
            }
            _ => self.expand_storage(symbol, node, depth),
        }
    }

    /// Locals and static members: follow every write site.
    fn expand_storage(
        &mut self,
        symbol: SymbolId,
        node: NodeId,
        depth: u32,
    ) -> Result<(), Cancelled> {
        for site in write_sites(self.model, symbol) {
            if self.token.is_cancelled() {
                return Err(Cancelled);
            }
            let contributors = {
                let Some(rhs) = self.model.node_spanning(site.file, &site.rhs_span) else {
                    continue;
                };
                rhs_contributors(self.model, site.file, rhs, &mut self.invocations)
            };
            for contributor in contributors {
                if contributor.symbol == symbol {
                    continue;
                }
                self.emit(
                    node,
                    contributor.symbol,
                    site.relation,
                    site.file,
                    contributor.span,
                    depth,
                )?;
            }
        }
        Ok(())
    }

    /// Methods: return contributors, then override fan-out. Overrides are
    /// resolved only from the originally dispatched method — an override
    /// expansion never re-triggers override resolution.
    fn expand_method(
        &mut self,
        method: SymbolId,
        node: NodeId,
        depth: u32,
        in_override: bool,
    ) -> Result<(), Cancelled> {
        let file = self.model.symbol(method).file();
        let contributors = return_contributors(self.model, method, &mut self.invocations);
        for contributor in contributors {
            if contributor.symbol == method {
                continue;
            }
            self.emit(
                node,
                contributor.symbol,
                Relation::ReturnContributor,
                file,
                contributor.span,
                depth,
            )?;
        }

        let dispatchable = self
            .model
            .symbol(method)
            .method_data()
            .map(|md| md.is_virtual || md.is_abstract || md.is_override)
            .unwrap_or(false);
        if in_override || !dispatchable {
            return Ok(());
        }

        let base = self.model.override_base(method);
        for override_sym in sibling_overrides(self.model, method) {
            if self.token.is_cancelled() {
                return Err(Cancelled);
            }
            let override_node = self.intern(override_sym);
            let location = self.model.location(override_sym);
            let origin = classify::node_location(self.model, &location);
            self.graph
                .add_edge(node, override_node, InsightEdge::new(Relation::Override, origin));

            // hand the base call site to the override so its instance
            // members can trace back to the dispatch receiver
            let site = self
                .invocations
                .get(method)
                .or_else(|| self.invocations.get(base))
                .cloned();
            if let Some(site) = site {
                self.invocations.insert_if_absent(override_sym, site);
            }

            self.expand(override_sym, override_node, depth + 1, true)?;
        }
        Ok(())
    }

    /// Parameters: map to the argument at the recorded call site, if any.
    fn expand_parameter(
        &mut self,
        param: SymbolId,
        node: NodeId,
        depth: u32,
    ) -> Result<(), Cancelled> {
        if let Some((file, contributor)) = map_parameter(self.model, param, &self.invocations) {
            if contributor.symbol != param {
                self.emit(
                    node,
                    contributor.symbol,
                    Relation::ParameterMapping,
                    file,
                    contributor.span,
                    depth,
                )?;
            }
        }
        Ok(())
    }

    /// Instance fields/properties: object-initializer tracing when a
    /// compatible call site is known, else ordinary write-site analysis.
    fn expand_instance_member(
        &mut self,
        member: SymbolId,
        node: NodeId,
        depth: u32,
    ) -> Result<(), Cancelled> {
        match trace_member_initializer(self.model, member, &self.invocations) {
            Some(MemberTrace::Value { symbol, file, span }) => {
                if symbol != member {
                    self.emit(node, symbol, Relation::ObjectInitializer, file, span, depth)?;
                }
                Ok(())
            }
            Some(MemberTrace::Receiver { symbol, file, span }) => {
                // record the construction site without chasing a constant
                let receiver_node = self.intern(symbol);
                let origin = self.origin_location(file, span.start);
                self.graph.add_edge(
                    node,
                    receiver_node,
                    InsightEdge::new(Relation::ObjectInitializer, origin),
                );
                Ok(())
            }
            Some(MemberTrace::Blocked) => Ok(()),
            None => self.expand_storage(member, node, depth),
        }
    }

    /// Append an edge (deduplicated by triple) and keep expanding.
    fn emit(
        &mut self,
        from: NodeId,
        target: SymbolId,
        relation: Relation,
        file: FileId,
        origin: Range<usize>,
        depth: u32,
    ) -> Result<(), Cancelled> {
        let target_node = self.intern(target);
        let edge = InsightEdge::new(relation, self.origin_location(file, origin.start));
        self.graph.add_edge(from, target_node, edge);
        self.expand(target, target_node, depth + 1, false)
    }

    fn intern(&mut self, symbol: SymbolId) -> NodeId {
        if let Some(&existing) = self.node_of.get(&symbol) {
            return existing;
        }
        let id = self.graph.intern(classify::materialize(self.model, symbol));
        self.node_of.insert(symbol, id);
        id
    }

    fn origin_location(&self, file: FileId, offset: usize) -> NodeLocation {
        let doc = self.model.workspace().document(file);
        let position = doc.position_at(offset);
        NodeLocation::new(doc.path().to_path_buf(), position.line, position.column)
    }
}
