//! Object-initializer tracing for instance members.
//!
//! An instance field or property used inside a called method traces back to
//! the value the call's receiver assigned to it at construction:
//! `s.GetArea()` with `Shape s = new Rectangle { Width = 2 }` links
//! `Width` to `2`'s assignment. The receiver's statically instantiated
//! concrete type must match the member's containing type, so a `Rectangle`
//! receiver never feeds `Circle.Radius`.

use std::ops::Range;

use super::contributors::InvocationMap;
use crate::semantic::{SemanticModel, SymbolId, SymbolKind};
use crate::syntax::{find_child_by_kind, node_text};
use crate::workspace::FileId;

/// Outcome of tracing one instance member through a candidate invocation.
#[derive(Debug)]
pub enum MemberTrace {
    /// The initializer assigned a single analyzable identifier; recurse into it.
    Value {
        symbol: SymbolId,
        file: FileId,
        span: Range<usize>,
    },
    /// The initializer assigned a literal or complex value (or omitted the
    /// member): record the receiver as the source, do not recurse.
    Receiver {
        symbol: SymbolId,
        file: FileId,
        span: Range<usize>,
    },
    /// The receiver's concrete type fails the guard, or no object-creation
    /// syntax exists: the member is a leaf.
    Blocked,
}

/// Trace `member` through the recorded invocations. `None` means no
/// candidate invocation applies and the caller should fall back to
/// assignment analysis.
pub fn trace_member_initializer(
    model: &SemanticModel,
    member: SymbolId,
    invocations: &InvocationMap,
) -> Option<MemberTrace> {
    let member_symbol = model.symbol(member);
    let member_type = member_symbol.containing_type()?;

    for (method, site) in invocations.iter() {
        let method_symbol = model.symbol(method);
        if method_symbol.kind() != SymbolKind::Method
            || method_symbol.is_static()
            || method_symbol.containing_type() != Some(member_type)
        {
            continue;
        }

        let Some(invocation) =
            model.node_spanning_kind(site.file, &site.span, &["invocation_expression"])
        else {
            continue;
        };
        let Some(function) = invocation.child_by_field_name("function") else {
            continue;
        };
        if function.kind() != "member_access_expression" {
            // implicit-this call: no receiver declaration to trace
            continue;
        }
        let Some(receiver) = function.child_by_field_name("expression") else {
            continue;
        };
        if receiver.kind() != "identifier" {
            continue;
        }

        let src = model.workspace().document(site.file).source();
        let receiver_name = node_text(&receiver, src);
        let Some(receiver_sym) = model.bind_lexical(site.file, receiver.start_byte(), receiver_name)
        else {
            continue;
        };

        // Virtual-safe guard: a receiver constructed as a different concrete
        // type must not leak this member's initializer.
        if let Some(concrete) = model.concrete_type_at_declaration(receiver_sym) {
            if concrete != member_type {
                return Some(MemberTrace::Blocked);
            }
        }

        let Some((creation_file, creation)) = model.initializer_creation(receiver_sym) else {
            return Some(MemberTrace::Blocked);
        };
        let Some(initializer) = find_child_by_kind(&creation, "initializer_expression") else {
            return Some(MemberTrace::Blocked);
        };

        let creation_src = model.workspace().document(creation_file).source();
        let mut cursor = initializer.walk();
        let assignment = initializer.named_children(&mut cursor).find(|c| {
            c.kind() == "assignment_expression"
                && c.child_by_field_name("left")
                    .map(|l| node_text(&l, creation_src) == member_symbol.name())
                    .unwrap_or(false)
        });

        let Some(assignment) = assignment else {
            // constructed, but this member was not initialized: record the
            // assignment site via the receiver
            return Some(MemberTrace::Receiver {
                symbol: receiver_sym,
                file: creation_file,
                span: creation.byte_range(),
            });
        };

        if let Some(value) = assignment.child_by_field_name("right") {
            if value.kind() == "identifier" {
                if let Some(value_sym) = model.bind_identifier(creation_file, value) {
                    return Some(MemberTrace::Value {
                        symbol: value_sym,
                        file: creation_file,
                        span: assignment.byte_range(),
                    });
                }
            }
        }

        return Some(MemberTrace::Receiver {
            symbol: receiver_sym,
            file: creation_file,
            span: assignment.byte_range(),
        });
    }

    None
}
