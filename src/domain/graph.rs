use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::edge::GraphEdge;
use crate::domain::node::{Extra, GraphNode, NodeId};

/// Graph-level provenance written by the builder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    #[serde(default)]
    pub repository_name: Option<String>,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_symbols: u64,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Code graph - the `graph.json` member of a current-shape archive.
///
/// Nodes keep archive order so that every pass over them is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: IndexMap<NodeId, GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub metadata: GraphMetadata,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under the node's own id. A repeated id replaces the earlier node in place.
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
