//! Return-expression analysis for methods.
//!
//! Collects every `return` operand in the method body plus the body of an
//! expression-bodied method, and extracts their contributors. Returns of
//! nested local functions and lambdas belong to those callables and are
//! skipped.

use tree_sitter::Node;

use super::contributors::{rhs_contributors, Contributor, InvocationMap};
use crate::semantic::{SemanticModel, SymbolId};
use crate::syntax::{find_child_by_kind, preorder_pruned, NESTED_CALLABLE_KINDS};

/// Contributors flowing out of `method` through its return expressions,
/// deduplicated across multiple `return` statements.
pub fn return_contributors(
    model: &SemanticModel,
    method: SymbolId,
    invocations: &mut InvocationMap,
) -> Vec<Contributor> {
    let Some(decl) = model.declaring_node(method) else {
        // extern or metadata-only: nothing flows out
        return Vec::new();
    };
    let file = model.symbol(method).file();

    let mut expressions: Vec<Node> = Vec::new();
    for node in preorder_pruned(decl, NESTED_CALLABLE_KINDS) {
        if node.kind() == "return_statement" {
            if let Some(expr) = node.named_child(0) {
                expressions.push(expr);
            }
        }
    }
    if let Some(arrow) = find_child_by_kind(&decl, "arrow_expression_clause") {
        if let Some(expr) = arrow.named_child(0) {
            expressions.push(expr);
        }
    }

    let mut out: Vec<Contributor> = Vec::new();
    for expr in expressions {
        for contributor in rhs_contributors(model, file, expr, invocations) {
            if !out.iter().any(|c| c.symbol == contributor.symbol) {
                out.push(contributor);
            }
        }
    }
    out
}
