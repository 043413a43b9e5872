//! Symbol and type arenas for the C# semantic model.
//!
//! One pass over every parsed tree collects declarations into flat arenas:
//! named types with their base lists and members, methods with modifier
//! flags and parameters, fields, properties, locals, and C# top-level
//! statements (whose locals and local functions get no containing type).
//! Identifier occurrences are bound on demand by the binder, against these
//! arenas.

use std::collections::HashMap;
use std::ops::Range;
use tree_sitter::Node;

use crate::syntax::{field_text, find_child_by_kind, has_modifier, node_text};
use crate::workspace::{FileId, Workspace};

/// Arena index of a symbol. Symbol equality is index equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

/// Arena index of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

/// The kind of entity a symbol represents. Only these kinds are analyzable;
/// anything else never enters the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Local,
    Parameter,
    Field,
    Property,
    Method,
}

impl SymbolKind {
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Local => "local",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Field => "field",
            SymbolKind::Property => "property",
            SymbolKind::Method => "method",
        }
    }
}

/// A resolved source location: file, 1-based line/column, byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: FileId,
    pub line: u32,
    pub column: u32,
    pub span: Range<usize>,
}

/// Method-only attributes.
#[derive(Debug, Clone, Default)]
pub struct MethodData {
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_override: bool,
    pub params: Vec<SymbolId>,
}

/// Kind-specific symbol data.
#[derive(Debug, Clone)]
pub enum SymbolData {
    Local {
        /// `None` for locals declared by top-level statements
        containing_method: Option<SymbolId>,
    },
    Parameter {
        method: SymbolId,
        index: usize,
    },
    Field,
    Property,
    Method(MethodData),
}

/// One declared symbol.
#[derive(Debug, Clone)]
pub struct Symbol {
    kind: SymbolKind,
    name: String,
    /// Declared type text; return type for methods; `var` stays literal
    type_name: Option<String>,
    file: FileId,
    /// Span of the whole declaration node
    decl_span: Range<usize>,
    /// Span of the name identifier
    name_span: Range<usize>,
    containing_type: Option<TypeId>,
    is_static: bool,
    data: SymbolData,
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn decl_span(&self) -> &Range<usize> {
        &self.decl_span
    }

    pub fn name_span(&self) -> &Range<usize> {
        &self.name_span
    }

    pub fn containing_type(&self) -> Option<TypeId> {
        self.containing_type
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn data(&self) -> &SymbolData {
        &self.data
    }

    pub fn method_data(&self) -> Option<&MethodData> {
        match &self.data {
            SymbolData::Method(md) => Some(md),
            _ => None,
        }
    }

    /// For parameters: the declaring method and the parameter's index.
    pub fn parameter_of(&self) -> Option<(SymbolId, usize)> {
        match self.data {
            SymbolData::Parameter { method, index } => Some((method, index)),
            _ => None,
        }
    }

    /// For locals: the declaring method, if any.
    pub fn local_scope(&self) -> Option<SymbolId> {
        match self.data {
            SymbolData::Local { containing_method } => containing_method,
            _ => None,
        }
    }
}

/// A named type (class, struct, record, or interface).
#[derive(Debug, Clone)]
pub struct TypeDef {
    name: String,
    file: FileId,
    span: Range<usize>,
    /// Base-list entries, reduced to bare type names
    base_names: Vec<String>,
    members: Vec<SymbolId>,
}

impl TypeDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn span(&self) -> &Range<usize> {
        &self.span
    }

    pub fn base_names(&self) -> &[String] {
        &self.base_names
    }

    pub fn members(&self) -> &[SymbolId] {
        &self.members
    }
}

/// The symbol and type arenas for one workspace.
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    types: Vec<TypeDef>,
    types_by_name: HashMap<String, TypeId>,
}

impl SymbolTable {
    /// Walk every document and collect its declarations.
    pub fn build(workspace: &Workspace) -> Self {
        let mut builder = Builder {
            table: SymbolTable {
                symbols: Vec::new(),
                types: Vec::new(),
                types_by_name: HashMap::new(),
            },
        };
        for file in workspace.file_ids() {
            let doc = workspace.document(file);
            builder.collect_container(doc.root(), file, doc.source());
            builder.collect_globals(doc.root(), file, doc.source());
        }
        builder.table
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0 as usize]
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDef)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeId(i as u32), t))
    }

    pub fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.types_by_name.get(name).copied()
    }
}

/// Reduce a declared-type rendering to a bare name usable for table lookup:
/// `List<int>` → `List`, `Shape[]` → `Shape`, `int?` → `int`,
/// `Geometry.Shape` → `Shape`.
pub(crate) fn type_name_root(text: &str) -> &str {
    let t = text.trim();
    let t = t.split(['<', '[', '?']).next().unwrap_or(t).trim_end();
    t.rsplit('.').next().unwrap_or(t)
}

struct Builder {
    table: SymbolTable,
}

impl Builder {
    fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.table.symbols.len() as u32);
        self.table.symbols.push(symbol);
        id
    }

    fn add_type(&mut self, type_def: TypeDef) -> TypeId {
        let id = TypeId(self.table.types.len() as u32);
        self.table
            .types_by_name
            .entry(type_def.name.clone())
            .or_insert(id);
        self.table.types.push(type_def);
        id
    }

    /// Walk a compilation unit or namespace body for type declarations.
    fn collect_container(&mut self, node: Node, file: FileId, src: &str) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "namespace_declaration" => {
                    if let Some(body) = child.child_by_field_name("body") {
                        self.collect_container(body, file, src);
                    }
                }
                "file_scoped_namespace_declaration" => {
                    self.collect_container(child, file, src);
                }
                "class_declaration"
                | "struct_declaration"
                | "record_declaration"
                | "record_struct_declaration"
                | "interface_declaration" => {
                    self.collect_type(&child, file, src);
                }
                _ => {}
            }
        }
    }

    fn collect_type(&mut self, node: &Node, file: FileId, src: &str) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };

        let mut base_names = Vec::new();
        if let Some(base_list) = find_child_by_kind(node, "base_list") {
            let mut cursor = base_list.walk();
            for base in base_list.named_children(&mut cursor) {
                let text = node_text(&base, src).trim().to_string();
                if !text.is_empty() {
                    base_names.push(type_name_root(&text).to_string());
                }
            }
        }

        let type_id = self.add_type(TypeDef {
            name: node_text(&name_node, src).to_string(),
            file,
            span: node.byte_range(),
            base_names,
            members: Vec::new(),
        });

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };

        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" => {
                    if let Some(id) = self.collect_method(&member, file, src, Some(type_id)) {
                        self.table.types[type_id.0 as usize].members.push(id);
                    }
                }
                "property_declaration" => {
                    if let Some(id) = self.collect_property(&member, file, src, type_id) {
                        self.table.types[type_id.0 as usize].members.push(id);
                    }
                }
                "field_declaration" => {
                    let ids = self.collect_field(&member, file, src, type_id);
                    self.table.types[type_id.0 as usize].members.extend(ids);
                }
                "class_declaration"
                | "struct_declaration"
                | "record_declaration"
                | "record_struct_declaration"
                | "interface_declaration" => {
                    self.collect_type(&member, file, src);
                }
                _ => {}
            }
        }
    }

    fn collect_method(
        &mut self,
        node: &Node,
        file: FileId,
        src: &str,
        containing_type: Option<TypeId>,
    ) -> Option<SymbolId> {
        let name_node = node.child_by_field_name("name")?;

        // method_declaration uses the "returns" field; local_function_statement
        // uses "type"
        let return_type = field_text(node, "returns", src).or_else(|| field_text(node, "type", src));

        let method_id = self.add_symbol(Symbol {
            kind: SymbolKind::Method,
            name: node_text(&name_node, src).to_string(),
            type_name: return_type,
            file,
            decl_span: node.byte_range(),
            name_span: name_node.byte_range(),
            containing_type,
            is_static: has_modifier(node, src, "static"),
            data: SymbolData::Method(MethodData {
                is_virtual: has_modifier(node, src, "virtual"),
                is_abstract: has_modifier(node, src, "abstract"),
                is_override: has_modifier(node, src, "override"),
                params: Vec::new(),
            }),
        });

        let mut params = Vec::new();
        if let Some(list) = node.child_by_field_name("parameters") {
            let mut cursor = list.walk();
            for param in list
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "parameter")
            {
                let Some(param_name) = param.child_by_field_name("name") else {
                    continue;
                };
                let index = params.len();
                params.push(self.add_symbol(Symbol {
                    kind: SymbolKind::Parameter,
                    name: node_text(&param_name, src).to_string(),
                    type_name: field_text(&param, "type", src),
                    file,
                    decl_span: param.byte_range(),
                    name_span: param_name.byte_range(),
                    containing_type,
                    is_static: false,
                    data: SymbolData::Parameter {
                        method: method_id,
                        index,
                    },
                }));
            }
        }
        if let SymbolData::Method(md) = &mut self.table.symbols[method_id.0 as usize].data {
            md.params = params;
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.collect_locals(body, file, src, method_id, containing_type);
        } else if let Some(arrow) = find_child_by_kind(node, "arrow_expression_clause") {
            self.collect_locals(arrow, file, src, method_id, containing_type);
        }

        Some(method_id)
    }

    fn collect_property(
        &mut self,
        node: &Node,
        file: FileId,
        src: &str,
        containing_type: TypeId,
    ) -> Option<SymbolId> {
        let name_node = node.child_by_field_name("name")?;
        Some(self.add_symbol(Symbol {
            kind: SymbolKind::Property,
            name: node_text(&name_node, src).to_string(),
            type_name: field_text(node, "type", src),
            file,
            decl_span: node.byte_range(),
            name_span: name_node.byte_range(),
            containing_type: Some(containing_type),
            is_static: has_modifier(node, src, "static"),
            data: SymbolData::Property,
        }))
    }

    fn collect_field(
        &mut self,
        node: &Node,
        file: FileId,
        src: &str,
        containing_type: TypeId,
    ) -> Vec<SymbolId> {
        // field_declaration → variable_declaration → variable_declarator;
        // variable_declaration is not a named field
        let Some(decl) = find_child_by_kind(node, "variable_declaration") else {
            return Vec::new();
        };
        let field_type = field_text(&decl, "type", src);
        let is_static = has_modifier(node, src, "static") || has_modifier(node, src, "const");

        let mut ids = Vec::new();
        for (declarator, name_node) in declarator_names(&decl) {
            ids.push(self.add_symbol(Symbol {
                kind: SymbolKind::Field,
                name: node_text(&name_node, src).to_string(),
                type_name: field_type.clone(),
                file,
                decl_span: declarator.byte_range(),
                name_span: name_node.byte_range(),
                containing_type: Some(containing_type),
                is_static,
                data: SymbolData::Field,
            }));
        }
        ids
    }

    /// Walk a method body for local declarations and nested local functions.
    fn collect_locals(
        &mut self,
        node: Node,
        file: FileId,
        src: &str,
        method: SymbolId,
        containing_type: Option<TypeId>,
    ) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "local_function_statement" => {
                    self.collect_method(&child, file, src, containing_type);
                }
                "lambda_expression" | "anonymous_method_expression" => {}
                "local_declaration_statement" => {
                    if let Some(decl) = find_child_by_kind(&child, "variable_declaration") {
                        self.collect_local_declarators(&decl, file, src, Some(method));
                    }
                }
                "for_statement" | "using_statement" | "fixed_statement" => {
                    if let Some(decl) = find_child_by_kind(&child, "variable_declaration") {
                        self.collect_local_declarators(&decl, file, src, Some(method));
                    }
                    self.collect_locals(child, file, src, method, containing_type);
                }
                "foreach_statement" => {
                    if let Some(left) = child.child_by_field_name("left") {
                        if left.kind() == "identifier" {
                            self.add_symbol(Symbol {
                                kind: SymbolKind::Local,
                                name: node_text(&left, src).to_string(),
                                type_name: field_text(&child, "type", src),
                                file,
                                decl_span: left.byte_range(),
                                name_span: left.byte_range(),
                                containing_type,
                                is_static: false,
                                data: SymbolData::Local {
                                    containing_method: Some(method),
                                },
                            });
                        }
                    }
                    self.collect_locals(child, file, src, method, containing_type);
                }
                _ => self.collect_locals(child, file, src, method, containing_type),
            }
        }
    }

    fn collect_local_declarators(
        &mut self,
        decl: &Node,
        file: FileId,
        src: &str,
        containing_method: Option<SymbolId>,
    ) {
        let declared_type = field_text(decl, "type", src);
        let containing_type = containing_method
            .and_then(|m| self.table.symbols[m.0 as usize].containing_type);
        for (declarator, name_node) in declarator_names(decl) {
            self.add_symbol(Symbol {
                kind: SymbolKind::Local,
                name: node_text(&name_node, src).to_string(),
                type_name: declared_type.clone(),
                file,
                decl_span: declarator.byte_range(),
                name_span: name_node.byte_range(),
                containing_type,
                is_static: false,
                data: SymbolData::Local { containing_method },
            });
        }
    }

    /// Collect C# top-level statements: their locals and local functions
    /// live outside any type.
    fn collect_globals(&mut self, root: Node, file: FileId, src: &str) {
        let mut cursor = root.walk();
        for global in root
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "global_statement")
        {
            let mut inner = global.walk();
            for stmt in global.named_children(&mut inner) {
                match stmt.kind() {
                    "local_function_statement" => {
                        self.collect_method(&stmt, file, src, None);
                    }
                    "local_declaration_statement" => {
                        if let Some(decl) = find_child_by_kind(&stmt, "variable_declaration") {
                            self.collect_local_declarators(&decl, file, src, None);
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

/// The `(declarator, name)` pairs of a `variable_declaration`.
fn declarator_names<'a>(decl: &Node<'a>) -> Vec<(Node<'a>, Node<'a>)> {
    let mut out = Vec::new();
    let mut cursor = decl.walk();
    for declarator in decl
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "variable_declarator")
    {
        let name = declarator.child_by_field_name("name").or_else(|| {
            let mut inner = declarator.walk();
            let found = declarator
                .named_children(&mut inner)
                .find(|c| c.kind() == "identifier");
            found
        });
        if let Some(name_node) = name {
            out.push((declarator, name_node));
        }
    }
    out
}
