//! Edge types for the insight graph

use serde::Serialize;

use super::NodeLocation;

/// The influence relationship an edge represents.
///
/// The string labels are a stable contract consumed by output sinks.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The target contributes to the source's declaration initializer
    Initialization,
    /// The target contributes to an assignment into the source
    Assignment,
    /// The target appears in a return expression of the source method
    ReturnContributor,
    /// The source parameter maps to the target argument at a call site
    ParameterMapping,
    /// The source instance member was assigned via an object initializer
    ObjectInitializer,
    /// The target overrides the source's virtual/abstract base
    Override,
}

impl Relation {
    pub fn label(&self) -> &'static str {
        match self {
            Relation::Initialization => "Initialization",
            Relation::Assignment => "Assignment",
            Relation::ReturnContributor => "ReturnContributor",
            Relation::ParameterMapping => "ParameterMapping",
            Relation::ObjectInitializer => "ObjectInitializer",
            Relation::Override => "Override",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An edge in the insight graph: the target symbol influences the source
/// symbol through `relation`, manifesting at `origin`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InsightEdge {
    relation: Relation,

    /// Where the influence manifests (write site, argument, override
    /// declaration, initializer assignment)
    origin: NodeLocation,
}

impl InsightEdge {
    pub fn new(relation: Relation, origin: NodeLocation) -> Self {
        Self { relation, origin }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn origin(&self) -> &NodeLocation {
        &self.origin
    }
}
