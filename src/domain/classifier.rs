use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::node::{GraphNode, NodeKind, NodeMetadata};

/// Connectivity above which a node counts as a hub (strictly greater than).
pub const HUB_THRESHOLD: u32 = 5;

const FAN_IN_WEIGHT: f64 = 2.0;
const FAN_OUT_WEIGHT: f64 = 1.0;
const COMPLEXITY_DIVISOR: f64 = 10.0;
const PUBLIC_API_BONUS: f64 = 5.0;

/// Semantic role of a node in the visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum VisualizationRole {
    /// High fan-in, called by many
    CoreUtility,
    /// High fan-out, calls many things
    EntryPoint,
    /// Type node
    DataModel,
    /// Private, low connectivity
    Internal,
    /// Semantic cluster node
    Cluster,
    Standard,
}

impl VisualizationRole {
    pub const ALL: [VisualizationRole; 6] = [
        VisualizationRole::CoreUtility,
        VisualizationRole::EntryPoint,
        VisualizationRole::DataModel,
        VisualizationRole::Internal,
        VisualizationRole::Cluster,
        VisualizationRole::Standard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationRole::CoreUtility => "CoreUtility",
            VisualizationRole::EntryPoint => "EntryPoint",
            VisualizationRole::DataModel => "DataModel",
            VisualizationRole::Internal => "Internal",
            VisualizationRole::Cluster => "Cluster",
            VisualizationRole::Standard => "Standard",
        }
    }
}

/// Accepts `CoreUtility`, `core_utility` and `core-utility`, in any case.
impl FromStr for VisualizationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

impl fmt::Display for VisualizationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub role: VisualizationRole,
    pub importance: f64,
}

// -----------------------------------------------------------------------------
// Core algorithm (domain layer)
// -----------------------------------------------------------------------------

/// Assigns role and importance from the node's own kind, metadata and visibility only.
pub fn classify(node: &GraphNode) -> Classification {
    Classification {
        role: assign_role(&node.kind, &node.metadata),
        importance: importance(&node.metadata),
    }
}

/// First match wins: cluster, type, fan-in hub, fan-out hub, private, standard.
/// Kind checks run before connectivity so a heavily used type stays a data model.
pub fn assign_role(kind: &NodeKind, metadata: &NodeMetadata) -> VisualizationRole {
    match kind {
        NodeKind::Cluster(_) => VisualizationRole::Cluster,
        NodeKind::Type(_) => VisualizationRole::DataModel,
        _ if metadata.fan_in > HUB_THRESHOLD => VisualizationRole::CoreUtility,
        _ if metadata.fan_out > HUB_THRESHOLD => VisualizationRole::EntryPoint,
        _ if !kind.is_public() => VisualizationRole::Internal,
        _ => VisualizationRole::Standard,
    }
}

/// `fan_in * 2 + fan_out + complexity / 10 + (public API ? 5 : 0)`, unrounded.
///
/// Uses the metadata-level `is_public_api` flag, never the kind-level visibility.
pub fn importance(metadata: &NodeMetadata) -> f64 {
    let complexity = metadata.complexity.unwrap_or(0.0);
    let api_bonus = if metadata.is_public_api {
        PUBLIC_API_BONUS
    } else {
        0.0
    };

    f64::from(metadata.fan_in) * FAN_IN_WEIGHT
        + f64::from(metadata.fan_out) * FAN_OUT_WEIGHT
        + complexity / COMPLEXITY_DIVISOR
        + api_bonus
}
