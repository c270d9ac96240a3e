use crate::domain::classifier::VisualizationRole;
use crate::domain::documentation::SymbolDoc;
use crate::domain::index::Neighbor;
use crate::domain::legacy::LegacyDoc;
use crate::domain::visualization::{VisualizationNode, VisualizationStats};
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    /// Storage key the archive was loaded from
    pub archive: String,
    /// "current" or "legacy"
    pub shape: String,
    pub project_name: Option<String>,
    pub tracked_branch: Option<String>,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatsResponse {
    pub shape: String,
    pub project_name: Option<String>,
    pub stats: VisualizationStats,
    pub roles: Vec<RoleCount>,
    /// Documented symbols in the archive
    pub documented_symbols: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RoleCount {
    pub role: VisualizationRole,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TopResponse {
    pub items: Vec<TopItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TopItem {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub role: VisualizationRole,
    pub importance: f64,
    pub fan_in: u32,
    pub fan_out: u32,
}

impl From<&VisualizationNode> for TopItem {
    fn from(node: &VisualizationNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind.clone(),
            role: node.role,
            importance: node.importance,
            fan_in: node.fan_in,
            fan_out: node.fan_out,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
    pub total_matches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchItem {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub role: VisualizationRole,
    pub importance: f64,
    pub file: String,
    pub line: u32,
}

impl From<&VisualizationNode> for SearchItem {
    fn from(node: &VisualizationNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind.clone(),
            role: node.role,
            importance: node.importance,
            file: node.file.clone(),
            line: node.line,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SymbolDetailResponse {
    pub node: VisualizationNode,
    pub documentation: Option<DocumentationDto>,
    /// Nodes with an edge pointing at this one
    pub incoming: Vec<Neighbor>,
    /// Nodes this one points at
    pub outgoing: Vec<Neighbor>,
}

/// Documentation for one symbol, flattened across both archive shapes
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DocumentationDto {
    pub summary: String,
    pub explanation: String,
    pub complexity_notes: Option<String>,
    pub usage_hints: Option<String>,
    pub parameters: Vec<ParameterDoc>,
    pub returns: Option<String>,
    pub example: Option<String>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParameterDoc {
    pub name: String,
    pub param_type: String,
    pub description: String,
}

impl From<&SymbolDoc> for DocumentationDto {
    fn from(doc: &SymbolDoc) -> Self {
        Self {
            summary: doc.purpose.clone(),
            explanation: doc.explanation.clone(),
            complexity_notes: doc.complexity_notes.clone(),
            usage_hints: doc.usage_hints.clone(),
            ..Default::default()
        }
    }
}

impl From<&LegacyDoc> for DocumentationDto {
    fn from(doc: &LegacyDoc) -> Self {
        let non_empty = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());
        Self {
            summary: doc.summary.clone(),
            explanation: doc.description.clone(),
            complexity_notes: None,
            usage_hints: None,
            parameters: doc
                .parameters
                .iter()
                .map(|p| ParameterDoc {
                    name: p.name.clone(),
                    param_type: p.param_type.clone(),
                    description: p.description.clone(),
                })
                .collect(),
            returns: non_empty(&doc.returns),
            example: non_empty(&doc.example),
            notes: doc.notes.clone(),
        }
    }
}
