//! The C# semantic model: every query the analysis passes need about
//! symbols, types, locations, and syntax.
//!
//! Built once over a parsed [`Workspace`]. Symbol and type facts live in
//! flat arenas ([`SymbolTable`]); syntax nodes are re-realized from the
//! owning tree on demand via stored byte spans, so nothing here holds
//! self-referential borrows.

pub mod binder;
pub mod symbols;

pub use symbols::{
    MethodData, SourceLocation, Symbol, SymbolData, SymbolId, SymbolKind, SymbolTable, TypeDef,
    TypeId,
};

use std::ops::Range;
use std::path::Path;
use tree_sitter::Node;

use crate::syntax::{field_text, initializer_value};
use crate::workspace::{FileId, Workspace};
use symbols::type_name_root;

/// A handle to a piece of syntax: the owning file plus the node's byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxRef {
    pub file: FileId,
    pub span: Range<usize>,
}

/// Semantic queries over one workspace.
pub struct SemanticModel {
    workspace: Workspace,
    table: SymbolTable,
}

impl SemanticModel {
    /// Build the symbol table for `workspace` and wrap both.
    pub fn build(workspace: Workspace) -> Self {
        let table = SymbolTable::build(&workspace);
        Self { workspace, table }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.table.symbol(id)
    }

    pub fn file_path(&self, file: FileId) -> &Path {
        self.workspace.document(file).path()
    }

    // ── Syntax realization ───────────────────────────────────────────────

    /// The deepest named node whose byte range equals `span`.
    pub fn node_spanning(&self, file: FileId, span: &Range<usize>) -> Option<Node<'_>> {
        let root = self.workspace.document(file).root();
        let node = root.named_descendant_for_byte_range(span.start, span.end)?;
        (node.byte_range() == *span).then_some(node)
    }

    /// Like [`node_spanning`](Self::node_spanning) but climbs same-extent
    /// ancestors until one of `kinds` matches. Needed because a declarator
    /// without an initializer shares its extent with its name identifier.
    pub fn node_spanning_kind(
        &self,
        file: FileId,
        span: &Range<usize>,
        kinds: &[&str],
    ) -> Option<Node<'_>> {
        let mut node = self.node_spanning(file, span)?;
        loop {
            if kinds.contains(&node.kind()) {
                return Some(node);
            }
            let parent = node.parent()?;
            if parent.byte_range() != *span {
                return None;
            }
            node = parent;
        }
    }

    /// Re-realize a symbol's declaring syntax node.
    pub fn declaring_node(&self, sym: SymbolId) -> Option<Node<'_>> {
        let s = self.symbol(sym);
        let kinds: &[&str] = match s.kind() {
            SymbolKind::Local => &["variable_declarator", "identifier"],
            SymbolKind::Parameter => &["parameter"],
            SymbolKind::Field => &["variable_declarator"],
            SymbolKind::Property => &["property_declaration"],
            SymbolKind::Method => &["method_declaration", "local_function_statement"],
        };
        self.node_spanning_kind(s.file(), s.decl_span(), kinds)
    }

    // ── Display and locations ────────────────────────────────────────────

    /// Qualified rendering used for node identity: `Type.name` for members
    /// and for symbols scoped inside a type's methods, bare `name` otherwise.
    pub fn display_string(&self, sym: SymbolId) -> String {
        let s = self.symbol(sym);
        match s.containing_type() {
            Some(t) => format!("{}.{}", self.table.type_def(t).name(), s.name()),
            None => s.name().to_string(),
        }
    }

    /// Primary location: the symbol's name identifier.
    pub fn location(&self, sym: SymbolId) -> SourceLocation {
        let s = self.symbol(sym);
        let doc = self.workspace.document(s.file());
        let pos = doc.position_at(s.name_span().start);
        SourceLocation {
            file: s.file(),
            line: pos.line,
            column: pos.column,
            span: s.name_span().clone(),
        }
    }

    /// Short rendering of a location: `basename:line`.
    pub fn location_string(&self, loc: &SourceLocation) -> String {
        let path = self.workspace.document(loc.file).path();
        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        format!("{}:{}", basename, loc.line)
    }

    /// The trimmed source line a location points at.
    pub fn source_line(&self, loc: &SourceLocation) -> String {
        self.workspace
            .document(loc.file)
            .line_text(loc.line)
            .trim()
            .to_string()
    }

    // ── Type queries ─────────────────────────────────────────────────────

    /// The first base-list entry that resolves to a workspace type. C#
    /// convention puts the base class first, so interfaces rarely shadow it.
    pub fn base_type_of(&self, t: TypeId) -> Option<TypeId> {
        self.table
            .type_def(t)
            .base_names()
            .iter()
            .find_map(|n| self.table.type_by_name(n))
    }

    /// Strict derivation: `t` is not `base` and `base` appears somewhere in
    /// `t`'s base chain.
    pub fn derives_from(&self, t: TypeId, base: TypeId) -> bool {
        if t == base {
            return false;
        }
        let mut seen = vec![t];
        let mut stack = vec![t];
        while let Some(cur) = stack.pop() {
            for name in self.table.type_def(cur).base_names() {
                if let Some(b) = self.table.type_by_name(name) {
                    if b == base {
                        return true;
                    }
                    if !seen.contains(&b) {
                        seen.push(b);
                        stack.push(b);
                    }
                }
            }
        }
        false
    }

    /// Find a member by name on `t` or any type in its base chain.
    pub fn lookup_member(&self, t: TypeId, name: &str) -> Option<SymbolId> {
        self.lookup_member_where(t, name, |_| true)
    }

    /// Find a method member by name on `t` or any type in its base chain.
    pub fn lookup_method(&self, t: TypeId, name: &str) -> Option<SymbolId> {
        self.lookup_member_where(t, name, |s| s.kind() == SymbolKind::Method)
    }

    fn lookup_member_where(
        &self,
        t: TypeId,
        name: &str,
        accept: impl Fn(&Symbol) -> bool,
    ) -> Option<SymbolId> {
        let mut seen = vec![t];
        let mut current = Some(t);
        while let Some(ty) = current {
            for &member in self.table.type_def(ty).members() {
                let s = self.symbol(member);
                if s.name() == name && accept(s) {
                    return Some(member);
                }
            }
            current = self.base_type_of(ty).filter(|b| {
                if seen.contains(b) {
                    false
                } else {
                    seen.push(*b);
                    true
                }
            });
        }
        None
    }

    // ── Override chains ──────────────────────────────────────────────────

    /// The method this override overrides: the nearest base-chain method of
    /// the same name that is virtual, abstract, or itself an override.
    pub fn overridden_method(&self, m: SymbolId) -> Option<SymbolId> {
        let s = self.symbol(m);
        let md = s.method_data()?;
        if !md.is_override {
            return None;
        }
        let mut seen = vec![s.containing_type()?];
        let mut current = self.base_type_of(s.containing_type()?);
        while let Some(t) = current {
            if seen.contains(&t) {
                break;
            }
            seen.push(t);
            for &member in self.table.type_def(t).members() {
                let ms = self.symbol(member);
                if ms.kind() == SymbolKind::Method && ms.name() == s.name() {
                    if let Some(base_md) = ms.method_data() {
                        if base_md.is_virtual || base_md.is_abstract || base_md.is_override {
                            return Some(member);
                        }
                    }
                }
            }
            current = self.base_type_of(t);
        }
        None
    }

    /// Top of the override chain: the virtual/abstract declaration.
    pub fn override_base(&self, m: SymbolId) -> SymbolId {
        let mut seen = vec![m];
        let mut current = m;
        while let Some(base) = self.overridden_method(current) {
            if seen.contains(&base) {
                break;
            }
            seen.push(base);
            current = base;
        }
        current
    }

    // ── Declared and concrete types ──────────────────────────────────────

    /// The workspace type a symbol's declared type names. `var` is inferred
    /// from an object-creation initializer when present.
    pub fn declared_type_of(&self, sym: SymbolId) -> Option<TypeId> {
        let s = self.symbol(sym);
        if let Some(tn) = s.type_name() {
            if tn != "var" {
                return self.table.type_by_name(type_name_root(tn));
            }
        }
        let (file, creation) = self.declaration_creation(sym)?;
        let src = self.workspace.document(file).source();
        let tname = field_text(&creation, "type", src)?;
        self.table.type_by_name(type_name_root(&tname))
    }

    /// The statically instantiated concrete type: the `new T()` in the
    /// declaration initializer when the declaration has that shape, else the
    /// declared type.
    pub fn concrete_type_at_declaration(&self, sym: SymbolId) -> Option<TypeId> {
        if let Some((file, creation)) = self.declaration_creation(sym) {
            let src = self.workspace.document(file).source();
            if let Some(tname) = field_text(&creation, "type", src) {
                if let Some(t) = self.table.type_by_name(type_name_root(&tname)) {
                    return Some(t);
                }
            }
        }
        self.declared_type_of(sym)
    }

    /// The object-creation expression in `sym`'s declaration initializer.
    fn declaration_creation(&self, sym: SymbolId) -> Option<(FileId, Node<'_>)> {
        let s = self.symbol(sym);
        let decl = self.declaring_node(sym)?;
        if decl.kind() != "variable_declarator" && decl.kind() != "property_declaration" {
            return None;
        }
        let value = initializer_value(&decl)?;
        is_object_creation(&value).then_some((s.file(), value))
    }

    /// The `new T { ... }` that seeds `sym`'s value: the declaration
    /// initializer first, else the nearest assignment whose RHS is an
    /// object creation.
    pub fn initializer_creation(&self, sym: SymbolId) -> Option<(FileId, Node<'_>)> {
        if let Some(pair) = self.declaration_creation(sym) {
            return Some(pair);
        }
        for r in self.references(sym) {
            let Some(ident) = self.node_spanning_kind(r.file, &r.span, &["identifier"]) else {
                continue;
            };
            let Some(parent) = ident.parent() else {
                continue;
            };
            if parent.kind() != "assignment_expression" {
                continue;
            }
            let (Some(left), Some(right)) = (
                parent.child_by_field_name("left"),
                parent.child_by_field_name("right"),
            ) else {
                continue;
            };
            if left.id() == ident.id() && is_object_creation(&right) {
                return Some((r.file, right));
            }
        }
        None
    }

    // ── Selection ────────────────────────────────────────────────────────

    /// Resolve the symbol referenced or declared at a byte offset.
    pub fn symbol_at(&self, file: FileId, offset: usize) -> Option<SymbolId> {
        let root = self.workspace.document(file).root();
        let end = (offset + 1).min(root.end_byte());
        let mut node = root.named_descendant_for_byte_range(offset, end)?;
        if node.kind() != "identifier" {
            node = node
                .child_by_field_name("name")
                .filter(|n| n.kind() == "identifier")?;
        }
        self.bind_identifier(file, node)
    }
}

fn is_object_creation(node: &Node) -> bool {
    matches!(
        node.kind(),
        "object_creation_expression" | "implicit_object_creation_expression"
    )
}
