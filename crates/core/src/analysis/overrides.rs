//! Override fan-out for virtual dispatch.
//!
//! A call through a virtual, abstract, or overriding method may land in any
//! override of its base declaration, so each sibling override joins the
//! graph. Candidates come from every workspace type that strictly derives
//! from the base method's containing type.

use crate::semantic::{SemanticModel, SymbolId, SymbolKind};

/// All overrides of `method`'s base declaration, excluding `method` itself,
/// in type-declaration order.
pub fn sibling_overrides(model: &SemanticModel, method: SymbolId) -> Vec<SymbolId> {
    let base = model.override_base(method);
    let base_symbol = model.symbol(base);
    let Some(base_type) = base_symbol.containing_type() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (type_id, type_def) in model.table().types() {
        if !model.derives_from(type_id, base_type) {
            continue;
        }
        for &member in type_def.members() {
            if member == method {
                continue;
            }
            let symbol = model.symbol(member);
            if symbol.kind() != SymbolKind::Method || symbol.name() != base_symbol.name() {
                continue;
            }
            let Some(md) = symbol.method_data() else {
                continue;
            };
            if md.is_override && model.override_base(member) == base {
                out.push(member);
            }
        }
    }
    out
}
