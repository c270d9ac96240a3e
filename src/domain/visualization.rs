//! Visualization graph handed to the rendering layer as plain data.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::classifier::VisualizationRole;
use crate::domain::edge::EdgeKind;

/// Read-only projection of a graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VisualizationNode {
    pub id: String,
    pub name: String,
    /// "function", "type", "module", ...
    pub kind: String,
    pub file: String,
    pub line: u32,
    pub fan_in: u32,
    pub fan_out: u32,
    pub role: VisualizationRole,
    pub importance: f64,
    pub is_public: bool,
    pub complexity: Option<f64>,
    /// Cluster name, set only on cluster nodes
    pub cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VisualizationEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TopSymbol {
    pub id: String,
    pub name: String,
    pub importance: f64,
    pub role: VisualizationRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VisualizationStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub function_count: usize,
    pub type_count: usize,
    pub module_count: usize,
    pub cluster_count: usize,
    pub languages: Vec<String>,
    pub top_symbols: Vec<TopSymbol>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VisualizationGraph {
    pub nodes: Vec<VisualizationNode>,
    pub edges: Vec<VisualizationEdge>,
    pub stats: VisualizationStats,
}

impl VisualizationGraph {
    pub fn node(&self, id: &str) -> Option<&VisualizationNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
