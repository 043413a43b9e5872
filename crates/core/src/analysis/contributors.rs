//! Contributor extraction from right-hand sides.
//!
//! Given the RHS of a write site (or a return expression), yields the
//! symbols that directly contribute to it, in source order with invocation
//! targets appended. Identifiers inside invocation arguments and inside the
//! receivers of member-access invocations are excluded: arguments influence
//! the result only through the parameter→return chain, which the driver
//! threads separately.

use std::ops::Range;
use tree_sitter::Node;

use crate::semantic::{SemanticModel, SymbolId, SymbolKind, SyntaxRef};
use crate::syntax::{find_child_by_kind, preorder};
use crate::workspace::FileId;

/// One directly contributing symbol plus the span where it appears.
#[derive(Debug, Clone)]
pub struct Contributor {
    pub symbol: SymbolId,
    pub span: Range<usize>,
}

/// Working table linking each method to the most recently observed call
/// site. Insertion-ordered so candidate scans stay deterministic; a repeated
/// method overwrites its call site in place.
#[derive(Debug, Default)]
pub struct InvocationMap {
    entries: Vec<(SymbolId, SyntaxRef)>,
}

impl InvocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call site, overwriting any earlier one for this method.
    pub fn insert(&mut self, method: SymbolId, site: SyntaxRef) {
        if let Some(entry) = self.entries.iter_mut().find(|(m, _)| *m == method) {
            entry.1 = site;
        } else {
            self.entries.push((method, site));
        }
    }

    /// Record a call site only when the method has none yet. Used when
    /// propagating a base method's call site into its overrides.
    pub fn insert_if_absent(&mut self, method: SymbolId, site: SyntaxRef) {
        if self.get(method).is_none() {
            self.entries.push((method, site));
        }
    }

    pub fn get(&self, method: SymbolId) -> Option<&SyntaxRef> {
        self.entries
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SyntaxRef)> {
        self.entries.iter().map(|(m, s)| (*m, s))
    }
}

/// Extract the contributors of `rhs`, recording every observed invocation
/// into `invocations`.
pub fn rhs_contributors(
    model: &SemanticModel,
    file: FileId,
    rhs: Node,
    invocations: &mut InvocationMap,
) -> Vec<Contributor> {
    let nodes = preorder(rhs);
    let invocation_nodes: Vec<Node> = nodes
        .iter()
        .copied()
        .filter(|n| n.kind() == "invocation_expression")
        .collect();

    // Excluded regions: every argument list, plus the receiver of every
    // member-access invocation. Callee identifiers are skipped separately —
    // the method joins as a contributor below, not as an identifier.
    let mut argument_regions: Vec<Range<usize>> = Vec::new();
    let mut receiver_regions: Vec<Range<usize>> = Vec::new();
    let mut callee_spans: Vec<Range<usize>> = Vec::new();
    for inv in &invocation_nodes {
        if let Some(args) = find_child_by_kind(inv, "argument_list") {
            argument_regions.push(args.byte_range());
        }
        if let Some(function) = inv.child_by_field_name("function") {
            match function.kind() {
                "member_access_expression" => {
                    if let Some(receiver) = function.child_by_field_name("expression") {
                        receiver_regions.push(receiver.byte_range());
                    }
                    if let Some(name) = function.child_by_field_name("name") {
                        callee_spans.push(name.byte_range());
                    }
                }
                "identifier" => callee_spans.push(function.byte_range()),
                _ => {}
            }
        }
    }

    let covered = |regions: &[Range<usize>], span: &Range<usize>| {
        regions
            .iter()
            .any(|r| r.start <= span.start && span.end <= r.end)
    };

    let mut seen: Vec<SymbolId> = Vec::new();
    let mut out: Vec<Contributor> = Vec::new();

    for node in nodes.iter().filter(|n| n.kind() == "identifier") {
        let span = node.byte_range();
        if covered(&argument_regions, &span)
            || covered(&receiver_regions, &span)
            || callee_spans.contains(&span)
        {
            continue;
        }
        if let Some(symbol) = model.bind_identifier(file, *node) {
            if !seen.contains(&symbol) {
                seen.push(symbol);
                out.push(Contributor { symbol, span });
            }
        }
    }

    for inv in invocation_nodes {
        let Some(function) = inv.child_by_field_name("function") else {
            continue;
        };
        let target_ident = match function.kind() {
            "identifier" => Some(function),
            "member_access_expression" => function.child_by_field_name("name"),
            _ => None,
        };
        let Some(method) = target_ident.and_then(|n| model.bind_identifier(file, n)) else {
            continue;
        };
        if model.symbol(method).kind() != SymbolKind::Method {
            continue;
        }

        let span = inv.byte_range();
        // Every observed call site is recorded, but an invocation nested in
        // another invocation's arguments feeds that argument, not the RHS.
        invocations.insert(
            method,
            SyntaxRef {
                file,
                span: span.clone(),
            },
        );
        if covered(&argument_regions, &span) {
            continue;
        }
        if !seen.contains(&method) {
            seen.push(method);
            out.push(Contributor {
                symbol: method,
                span,
            });
        }
    }

    out
}
