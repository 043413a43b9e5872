//! Node types for the insight graph

use serde::Serialize;
use std::path::PathBuf;

/// The kind of symbol an insight node represents
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum InsightNodeKind {
    /// A local variable
    Variable,
    /// A method parameter
    Parameter,
    /// A field
    Field,
    /// A property
    Property,
    /// A method
    Method,
    /// A non-symbol expression (reserved for sinks that render raw values)
    Expression,
}

impl InsightNodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            InsightNodeKind::Variable => "Variable",
            InsightNodeKind::Parameter => "Parameter",
            InsightNodeKind::Field => "Field",
            InsightNodeKind::Property => "Property",
            InsightNodeKind::Method => "Method",
            InsightNodeKind::Expression => "Expression",
        }
    }
}

impl std::fmt::Display for InsightNodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A resolved source position carried by nodes and edges.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NodeLocation {
    pub file: PathBuf,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl NodeLocation {
    pub fn new(file: PathBuf, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }

    /// Short rendering: `basename:line`.
    pub fn label(&self) -> String {
        let basename = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file.display().to_string());
        format!("{}:{}", basename, self.line)
    }
}

impl std::fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A node in the insight graph: one symbol that influences (or is) the
/// analysis root.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InsightNode {
    /// Composite identity: `display_string@basename:line`. Disambiguates
    /// overloads and same-named overrides.
    id: String,

    /// Short symbol name
    name: String,

    /// Declared type text (return type for methods)
    type_string: String,

    /// The kind of symbol this node represents
    kind: InsightNodeKind,

    /// Primary declaration location
    location: NodeLocation,

    /// Trimmed source line of the declaration
    source_excerpt: String,
}

impl InsightNode {
    pub fn new(
        id: String,
        name: String,
        type_string: String,
        kind: InsightNodeKind,
        location: NodeLocation,
        source_excerpt: String,
    ) -> Self {
        Self {
            id,
            name,
            type_string,
            kind,
            location,
            source_excerpt,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_string(&self) -> &str {
        &self.type_string
    }

    pub fn kind(&self) -> InsightNodeKind {
        self.kind
    }

    pub fn location(&self) -> &NodeLocation {
        &self.location
    }

    pub fn source_excerpt(&self) -> &str {
        &self.source_excerpt
    }
}
