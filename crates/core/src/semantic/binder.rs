//! On-demand identifier binding.
//!
//! Resolution order mirrors C# lookup for the supported subset: member
//! access binds through the receiver's type; a simple invocation target
//! binds against the enclosing type's methods, then file-level local
//! functions; everything else binds lexically (parameters, then locals of
//! the enclosing method, then members of the enclosing type walking its
//! base chain, then top-level locals).

use tree_sitter::Node;

use super::{SemanticModel, SymbolData, SymbolId, SymbolKind, SyntaxRef, TypeId};
use crate::syntax::{node_text, preorder};
use crate::workspace::FileId;

impl SemanticModel {
    /// Bind an identifier occurrence to its symbol, or `None` when it names
    /// nothing analyzable (a type, an unknown, a namespace segment).
    pub fn bind_identifier(&self, file: FileId, ident: Node) -> Option<SymbolId> {
        if ident.kind() != "identifier" {
            return None;
        }
        let src = self.workspace().document(file).source();
        let name = node_text(&ident, src);
        let parent = ident.parent()?;

        if parent.kind() == "member_access_expression" {
            if let Some(name_field) = parent.child_by_field_name("name") {
                if name_field.id() == ident.id() {
                    return self.bind_member_access(file, &parent, name);
                }
            }
        }

        if parent.kind() == "invocation_expression" {
            if let Some(function) = parent.child_by_field_name("function") {
                if function.id() == ident.id() {
                    return self.bind_callable(file, ident.start_byte(), name);
                }
            }
        }

        self.bind_lexical(file, ident.start_byte(), name)
    }

    /// Bind the `name` side of `receiver.name` through the receiver's type.
    fn bind_member_access(&self, file: FileId, access: &Node, name: &str) -> Option<SymbolId> {
        let src = self.workspace().document(file).source();
        let receiver = access.child_by_field_name("expression")?;
        match receiver.kind() {
            "this_expression" => {
                let t = self.enclosing_type(file, access.start_byte())?;
                self.lookup_member(t, name)
            }
            "identifier" => {
                let receiver_name = node_text(&receiver, src);
                if let Some(receiver_sym) =
                    self.bind_lexical(file, receiver.start_byte(), receiver_name)
                {
                    let t = self.declared_type_of(receiver_sym)?;
                    self.lookup_member(t, name)
                } else if let Some(t) = self.table().type_by_name(receiver_name) {
                    // static access: Type.Member
                    self.lookup_member(t, name)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Bind a simple invocation target `Name(...)`.
    fn bind_callable(&self, file: FileId, offset: usize, name: &str) -> Option<SymbolId> {
        if let Some(t) = self.enclosing_type(file, offset) {
            if let Some(m) = self.lookup_method(t, name) {
                return Some(m);
            }
        }
        // local functions declared outside any type (top-level statements)
        self.table().symbols().find_map(|(id, s)| {
            (s.kind() == SymbolKind::Method
                && s.file() == file
                && s.containing_type().is_none()
                && s.name() == name)
                .then_some(id)
        })
    }

    /// Lexical binding for a plain identifier at `offset`.
    pub(crate) fn bind_lexical(&self, file: FileId, offset: usize, name: &str) -> Option<SymbolId> {
        let scope = self.enclosing_method(file, offset);

        if let Some(method) = scope {
            if let Some(md) = self.symbol(method).method_data() {
                for &param in &md.params {
                    if self.symbol(param).name() == name {
                        return Some(param);
                    }
                }
            }
            if let Some(local) = self.find_local(file, Some(method), name, offset) {
                return Some(local);
            }
        }

        if let Some(t) = self.enclosing_type(file, offset) {
            if let Some(member) = self.lookup_member(t, name) {
                return Some(member);
            }
        }

        // Top-level locals are visible from top-level statements and from
        // local functions declared alongside them.
        let at_top_level = scope.map_or(true, |m| self.symbol(m).containing_type().is_none());
        if at_top_level {
            if let Some(local) = self.find_local(file, None, name, offset) {
                return Some(local);
            }
        }

        None
    }

    /// The local named `name` in `scope`, preferring the latest declaration
    /// at or before `offset` (redeclarations in sibling blocks resolve to
    /// the nearest preceding one).
    fn find_local(
        &self,
        file: FileId,
        scope: Option<SymbolId>,
        name: &str,
        offset: usize,
    ) -> Option<SymbolId> {
        let mut first = None;
        let mut preceding = None;
        for (id, s) in self.table().symbols() {
            if s.kind() != SymbolKind::Local || s.file() != file || s.name() != name {
                continue;
            }
            let SymbolData::Local { containing_method } = s.data() else {
                continue;
            };
            if *containing_method != scope {
                continue;
            }
            if first.is_none() {
                first = Some(id);
            }
            if s.name_span().start <= offset {
                preceding = Some(id);
            }
        }
        preceding.or(first)
    }

    /// The innermost method (or local function) whose declaration contains
    /// `offset`.
    pub(crate) fn enclosing_method(&self, file: FileId, offset: usize) -> Option<SymbolId> {
        let mut best: Option<(SymbolId, usize)> = None;
        for (id, s) in self.table().symbols() {
            if s.kind() != SymbolKind::Method || s.file() != file {
                continue;
            }
            let span = s.decl_span();
            if span.start <= offset && offset < span.end {
                let len = span.end - span.start;
                if best.map_or(true, |(_, l)| len < l) {
                    best = Some((id, len));
                }
            }
        }
        best.map(|(id, _)| id)
    }

    /// The innermost type whose declaration contains `offset`.
    pub(crate) fn enclosing_type(&self, file: FileId, offset: usize) -> Option<TypeId> {
        let mut best: Option<(TypeId, usize)> = None;
        for (id, t) in self.table().types() {
            if t.file() != file {
                continue;
            }
            let span = t.span();
            if span.start <= offset && offset < span.end {
                let len = span.end - span.start;
                if best.map_or(true, |(_, l)| len < l) {
                    best = Some((id, len));
                }
            }
        }
        best.map(|(id, _)| id)
    }

    /// Every identifier occurrence in the workspace that binds to `sym`,
    /// including its declaration name. File order, then source order.
    pub fn references(&self, sym: SymbolId) -> Vec<SyntaxRef> {
        let name = self.symbol(sym).name().to_string();
        let mut out = Vec::new();
        for file in self.workspace().file_ids() {
            let doc = self.workspace().document(file);
            let src = doc.source();
            for node in preorder(doc.root()) {
                if node.kind() != "identifier" || node_text(&node, src) != name {
                    continue;
                }
                if self.bind_identifier(file, node) == Some(sym) {
                    out.push(SyntaxRef {
                        file,
                        span: node.byte_range(),
                    });
                }
            }
        }
        out
    }
}
