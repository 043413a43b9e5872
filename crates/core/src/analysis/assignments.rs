//! Write-site discovery for storage symbols.
//!
//! A write site is a declarator (or property) with an initializer, the
//! left-hand side of an assignment or compound assignment, or the operand
//! of `++`/`--`. Reference lookups are best-effort: a reference that fails
//! to re-realize is skipped, never fatal.

use std::ops::Range;

use crate::graph::Relation;
use crate::semantic::{SemanticModel, SymbolId};
use crate::syntax::{initializer_value, node_text};
use crate::workspace::FileId;

/// One location where the symbol receives a value.
#[derive(Debug, Clone)]
pub struct WriteSite {
    pub file: FileId,
    /// The expression whose contributors flow into the symbol
    pub rhs_span: Range<usize>,
    /// The syntax that performs the write (declarator or assignment)
    pub origin_span: Range<usize>,
    pub relation: Relation,
}

/// Collect every write site of `sym`, declaration initializer first, then
/// assignments in reference order.
pub fn write_sites(model: &SemanticModel, sym: SymbolId) -> Vec<WriteSite> {
    let symbol = model.symbol(sym);
    let mut sites: Vec<WriteSite> = Vec::new();
    let mut seen: Vec<(FileId, Range<usize>)> = Vec::new();

    if let Some(decl) = model.declaring_node(sym) {
        if matches!(decl.kind(), "variable_declarator" | "property_declaration") {
            if let Some(value) = initializer_value(&decl) {
                seen.push((symbol.file(), decl.byte_range()));
                sites.push(WriteSite {
                    file: symbol.file(),
                    rhs_span: value.byte_range(),
                    origin_span: decl.byte_range(),
                    relation: Relation::Initialization,
                });
            }
        }
    }

    for reference in model.references(sym) {
        // the declaration name is not an assignment
        if reference.file == symbol.file()
            && symbol.decl_span().start <= reference.span.start
            && reference.span.end <= symbol.decl_span().end
        {
            continue;
        }
        let Some(ident) =
            model.node_spanning_kind(reference.file, &reference.span, &["identifier"])
        else {
            continue;
        };

        // `obj.F = v` and `this.F = v` assign through a member access
        let mut lhs = ident;
        if let Some(parent) = lhs.parent() {
            if parent.kind() == "member_access_expression"
                && parent.child_by_field_name("name").map(|n| n.id()) == Some(ident.id())
            {
                lhs = parent;
            }
        }

        let Some(parent) = lhs.parent() else {
            continue;
        };
        let site = match parent.kind() {
            "assignment_expression" => {
                let left = parent.child_by_field_name("left");
                let right = parent.child_by_field_name("right");
                match (left, right) {
                    (Some(left), Some(right)) if left.id() == lhs.id() => Some(WriteSite {
                        file: reference.file,
                        rhs_span: right.byte_range(),
                        origin_span: parent.byte_range(),
                        relation: Relation::Assignment,
                    }),
                    _ => None,
                }
            }
            "postfix_unary_expression" | "prefix_unary_expression" => {
                let src = model.workspace().document(reference.file).source();
                let text = node_text(&parent, src);
                (text.contains("++") || text.contains("--")).then(|| WriteSite {
                    file: reference.file,
                    rhs_span: parent.byte_range(),
                    origin_span: parent.byte_range(),
                    relation: Relation::Assignment,
                })
            }
            _ => None,
        };

        if let Some(site) = site {
            let key = (site.file, site.origin_span.clone());
            if !seen.contains(&key) {
                seen.push(key);
                sites.push(site);
            }
        }
    }

    sites
}
