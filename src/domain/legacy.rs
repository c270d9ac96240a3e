//! First-generation docpack records: `manifest.json`, `symbols.json` and the per-document docs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::node::Extra;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestStats {
    #[serde(default)]
    pub symbols_extracted: u64,
    #[serde(default)]
    pub docs_generated: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Project identity, stats and the visibility flag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub docpack_format: Option<u32>,
    #[serde(default)]
    pub project: ProjectInfo,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub language_summary: IndexMap<String, Value>,
    #[serde(default)]
    pub stats: ManifestStats,
    #[serde(default)]
    pub public: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Flat symbol record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacySymbol {
    pub id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyParam {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyDoc {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<LegacyParam>,
    #[serde(default)]
    pub returns: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// How the docs collection was laid out in the container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocsLayout {
    /// One `docs/<id>.json` member per record
    #[default]
    PerMember,
    /// A single `docs.json` array
    Bundled,
}

/// Decoded legacy-shape content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyContent {
    pub manifest: Manifest,
    pub symbols: Vec<LegacySymbol>,
    /// Document id → record
    pub docs: IndexMap<String, LegacyDoc>,
    pub docs_layout: DocsLayout,
}

impl LegacyContent {
    /// Doc linked from a symbol: by `doc_id` first, else the first doc documenting that symbol id.
    pub fn doc_for(&self, symbol: &LegacySymbol) -> Option<&LegacyDoc> {
        symbol
            .doc_id
            .as_deref()
            .and_then(|doc_id| self.docs.get(doc_id))
            .or_else(|| self.docs.values().find(|doc| doc.symbol == symbol.id))
    }
}
