//! Generated documentation: the `documentation.json` member of a current-shape archive.
//!
//! The text fields here are the ones the edit overlay rewrites (see [`crate::domain::edits`]).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::node::{Extra, NodeId};

/// Per-node documentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolDoc {
    #[serde(default)]
    pub node_id: NodeId,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub complexity_notes: Option<String>,
    #[serde(default)]
    pub usage_hints: Option<String>,
    #[serde(default)]
    pub caller_references: Vec<NodeId>,
    #[serde(default)]
    pub callee_references: Vec<NodeId>,
    #[serde(default)]
    pub semantic_cluster: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleDoc {
    #[serde(default)]
    pub module_name: String,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(default)]
    pub key_symbols: Vec<NodeId>,
    #[serde(default)]
    pub interactions: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureDoc {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub system_behavior: String,
    #[serde(default)]
    pub data_flow: String,
    #[serde(default)]
    pub key_components: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Documentation {
    #[serde(default)]
    pub symbol_summaries: IndexMap<NodeId, SymbolDoc>,
    #[serde(default)]
    pub module_overviews: IndexMap<String, ModuleDoc>,
    #[serde(default)]
    pub architecture_overview: ArchitectureDoc,
    #[serde(default)]
    pub total_tokens_used: u64,
    #[serde(flatten)]
    pub extra: Extra,
}
