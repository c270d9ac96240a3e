use crate::domain::classifier::classify;
use crate::domain::graph::Graph;
use crate::domain::node::NodeKind;
use crate::domain::visualization::{
    TopSymbol, VisualizationEdge, VisualizationGraph, VisualizationNode, VisualizationStats,
};

/// Number of entries in `top_symbols`.
pub const TOP_SYMBOL_LIMIT: usize = 10;

/// Visualization builder - Domain Service turning a code graph into a VisualizationGraph
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualizationBuilder;

impl VisualizationBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Four-pass build. Never fails: an empty graph yields an empty, zeroed result.
    pub fn build(&self, graph: &Graph) -> VisualizationGraph {
        // Pass 1: Node projection, in node-map order
        let nodes: Vec<VisualizationNode> = graph
            .nodes
            .iter()
            .map(|(id, node)| {
                let classification = classify(node);
                let cluster = match &node.kind {
                    NodeKind::Cluster(c) => Some(c.name.clone()),
                    _ => None,
                };
                VisualizationNode {
                    id: id.clone(),
                    name: node.name().to_string(),
                    kind: node.kind_label().to_string(),
                    file: node.location.file.clone(),
                    line: node.location.start_line,
                    fan_in: node.metadata.fan_in,
                    fan_out: node.metadata.fan_out,
                    role: classification.role,
                    importance: classification.importance,
                    is_public: node.is_public(),
                    complexity: node.metadata.complexity,
                    cluster,
                }
            })
            .collect();

        // Pass 2: Edge projection (order kept, dangling endpoints kept)
        let edges: Vec<VisualizationEdge> = graph
            .edges
            .iter()
            .map(|edge| VisualizationEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind,
            })
            .collect();

        // Pass 3: Ranking
        let top_symbols = top_symbols(&nodes, TOP_SYMBOL_LIMIT);

        // Pass 4: Aggregation
        let count_kind = |label: &str| nodes.iter().filter(|n| n.kind == label).count();
        let stats = VisualizationStats {
            node_count: nodes.len(),
            edge_count: edges.len(),
            function_count: count_kind("function"),
            type_count: count_kind("type"),
            module_count: count_kind("module"),
            cluster_count: count_kind("cluster"),
            languages: graph.metadata.languages.clone(),
            top_symbols,
        };

        VisualizationGraph {
            nodes,
            edges,
            stats,
        }
    }
}

/// Highest-importance nodes, descending. Ties keep their original relative order.
pub fn top_symbols(nodes: &[VisualizationNode], limit: usize) -> Vec<TopSymbol> {
    let mut ranked: Vec<&VisualizationNode> = nodes.iter().collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
        .into_iter()
        .take(limit)
        .map(|n| TopSymbol {
            id: n.id.clone(),
            name: n.name.clone(),
            importance: n.importance,
            role: n.role,
        })
        .collect()
}
