//! Parameter-to-argument mapping.
//!
//! When a parameter's declaring method has a recorded call site, the
//! parameter maps to the symbol supplied as the corresponding argument.
//! With no recorded call site the parameter is a leaf. Out-of-range indices
//! (params arrays, malformed sites) are skipped.

use super::contributors::{Contributor, InvocationMap};
use crate::semantic::{SemanticModel, SymbolId};
use crate::syntax::{find_child_by_kind, preorder};
use crate::workspace::FileId;

/// Resolve the argument symbol feeding `param` at its method's recorded
/// call site.
pub fn map_parameter(
    model: &SemanticModel,
    param: SymbolId,
    invocations: &InvocationMap,
) -> Option<(FileId, Contributor)> {
    let (method, index) = model.symbol(param).parameter_of()?;
    let site = invocations.get(method)?;
    let invocation = model.node_spanning_kind(site.file, &site.span, &["invocation_expression"])?;
    let argument_list = find_child_by_kind(&invocation, "argument_list")?;

    let mut cursor = argument_list.walk();
    let argument = argument_list
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "argument")
        .nth(index)?;

    // the expression is the argument's last named child (skips `ref`/`out`
    // modifiers and `name:` colons)
    let mut inner = argument.walk();
    let expr = argument.named_children(&mut inner).last()?;

    let symbol = if expr.kind() == "identifier" {
        model.bind_identifier(site.file, expr)
    } else {
        // not a bare identifier: take the first analyzable identifier under it
        preorder(expr)
            .into_iter()
            .filter(|n| n.kind() == "identifier")
            .find_map(|n| model.bind_identifier(site.file, n))
    }?;

    Some((
        site.file,
        Contributor {
            symbol,
            span: argument.byte_range(),
        },
    ))
}
