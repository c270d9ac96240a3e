use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::node::{Extra, NodeId};

/// Edge kind - relationship between two graph nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum EdgeKind {
    // ============ Control Flow ============
    Calls,
    TraitMethodCall,
    MethodDispatch,

    // ============ Dependencies ============
    Imports,
    TypeReference,
    InferredType,
    DataFlow,

    // ============ Structure ============
    ModuleOwnership,
    MethodOf,
    DefinedIn,

    // ============ Type Hierarchy ============
    TraitImplementation,
    Inheritance,
    TraitProvides,

    // ============ Macros ============
    MacroExpansion,
}

/// Directed edge. Endpoints may name ids absent from the node map (dangling); that is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    #[serde(flatten)]
    pub extra: Extra,
}

impl GraphEdge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            extra: Extra::new(),
        }
    }
}
