//! Docpack archive: one canonical in-memory model for both format generations.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::documentation::Documentation;
use crate::domain::graph::Graph;
use crate::domain::legacy::LegacyContent;
use crate::domain::node::Extra;

/// Package provenance (`metadata.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub generator: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub files_included: u64,
    #[serde(default)]
    pub total_size_bytes: u64,
    #[serde(default)]
    pub format: String,
    /// Member name → description
    #[serde(default)]
    pub contents: IndexMap<String, String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Decoded current-shape content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentContent {
    pub graph: Graph,
    pub documentation: Documentation,
    pub metadata: PackageMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveContent {
    Current(CurrentContent),
    Legacy(LegacyContent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveShape {
    Current,
    Legacy,
}

impl ArchiveShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveShape::Current => "current",
            ArchiveShape::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ArchiveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded docpack.
///
/// `extra_members` holds container members outside the detected shape, byte for byte, so re-encoding an
/// edited archive leaves them intact. `tracked_branch` belongs to the owning record, not the container,
/// and is attached by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    pub content: ArchiveContent,
    pub extra_members: IndexMap<String, Vec<u8>>,
    pub tracked_branch: Option<String>,
}

impl Archive {
    pub fn current(content: CurrentContent) -> Self {
        Self {
            content: ArchiveContent::Current(content),
            extra_members: IndexMap::new(),
            tracked_branch: None,
        }
    }

    pub fn legacy(content: LegacyContent) -> Self {
        Self {
            content: ArchiveContent::Legacy(content),
            extra_members: IndexMap::new(),
            tracked_branch: None,
        }
    }

    pub fn with_tracked_branch(mut self, branch: Option<String>) -> Self {
        self.tracked_branch = branch;
        self
    }

    pub fn shape(&self) -> ArchiveShape {
        match self.content {
            ArchiveContent::Current(_) => ArchiveShape::Current,
            ArchiveContent::Legacy(_) => ArchiveShape::Legacy,
        }
    }

    /// The code graph, when this is a current-shape archive.
    pub fn graph(&self) -> Option<&Graph> {
        match &self.content {
            ArchiveContent::Current(current) => Some(&current.graph),
            ArchiveContent::Legacy(_) => None,
        }
    }

    /// Display name of the packaged project.
    pub fn project_name(&self) -> Option<&str> {
        match &self.content {
            ArchiveContent::Current(current) => current.graph.metadata.repository_name.as_deref(),
            ArchiveContent::Legacy(legacy) => {
                Some(legacy.manifest.project.name.as_str()).filter(|name| !name.is_empty())
            }
        }
    }
}
