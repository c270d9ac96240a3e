use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::edge::EdgeKind;
use crate::domain::graph::Graph;
use crate::domain::node::NodeId;

/// Vertex weight: the node id and whether it exists in the node map
#[derive(Debug, Clone)]
pub struct IndexedNode {
    pub id: NodeId,
    pub present: bool,
}

/// Neighbour reached over one edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Neighbor {
    pub id: NodeId,
    pub kind: EdgeKind,
    /// False when the id is only referenced by edges
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DanglingEdge {
    /// Position in the graph's edge list
    pub position: usize,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub missing_source: bool,
    pub missing_target: bool,
}

/// Adjacency index over a code graph.
///
/// Dangling endpoints get placeholder vertices, so observed degrees count every edge in the list.
pub struct GraphIndex {
    graph: DiGraph<IndexedNode, EdgeKind>,
    id_to_node: HashMap<NodeId, NodeIndex>,
    dangling: Vec<DanglingEdge>,
}

impl GraphIndex {
    pub fn build(graph: &Graph) -> Self {
        let mut index = Self {
            graph: DiGraph::with_capacity(graph.node_count(), graph.edge_count()),
            id_to_node: HashMap::with_capacity(graph.node_count()),
            dangling: Vec::new(),
        };

        for id in graph.nodes.keys() {
            index.vertex(id, true);
        }

        for (position, edge) in graph.edges.iter().enumerate() {
            let missing_source = !graph.nodes.contains_key(&edge.source);
            let missing_target = !graph.nodes.contains_key(&edge.target);
            let source = index.vertex(&edge.source, !missing_source);
            let target = index.vertex(&edge.target, !missing_target);
            index.graph.add_edge(source, target, edge.kind);

            if missing_source || missing_target {
                index.dangling.push(DanglingEdge {
                    position,
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    kind: edge.kind,
                    missing_source,
                    missing_target,
                });
            }
        }

        index
    }

    fn vertex(&mut self, id: &str, present: bool) -> NodeIndex {
        if let Some(&idx) = self.id_to_node.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(IndexedNode {
            id: id.to_string(),
            present,
        });
        self.id_to_node.insert(id.to_string(), idx);
        idx
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_node
            .get(id)
            .is_some_and(|&idx| self.graph[idx].present)
    }

    /// Sources of edges pointing at `id`, in edge-list order.
    pub fn incoming(&self, id: &str) -> Vec<Neighbor> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Targets of edges leaving `id`, in edge-list order.
    pub fn outgoing(&self, id: &str) -> Vec<Neighbor> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<Neighbor> {
        let Some(&idx) = self.id_to_node.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| {
                let other = match direction {
                    Direction::Incoming => e.source(),
                    Direction::Outgoing => e.target(),
                };
                let weight = &self.graph[other];
                Neighbor {
                    id: weight.id.clone(),
                    kind: *e.weight(),
                    present: weight.present,
                }
            })
            .collect()
    }

    /// (fan-in, fan-out) counted from the edge list.
    pub fn observed_degree(&self, id: &str) -> Option<(u32, u32)> {
        let &idx = self.id_to_node.get(id)?;
        let fan_in = self.graph.edges_directed(idx, Direction::Incoming).count();
        let fan_out = self.graph.edges_directed(idx, Direction::Outgoing).count();
        Some((saturate(fan_in), saturate(fan_out)))
    }

    pub fn dangling_edges(&self) -> &[DanglingEdge] {
        &self.dangling
    }
}

fn saturate(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DegreeMismatch {
    pub id: NodeId,
    pub declared_fan_in: u32,
    pub observed_fan_in: u32,
    pub declared_fan_out: u32,
    pub observed_fan_out: u32,
}

/// Advisory consistency check between declared metadata and the edge list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectivityReport {
    pub mismatches: Vec<DegreeMismatch>,
    pub dangling_edges: Vec<DanglingEdge>,
}

impl ConnectivityReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty() && self.dangling_edges.is_empty()
    }
}

/// Compares every node's declared fan-in/fan-out with the edge list. Reports only; metadata stays
/// authoritative for classification.
pub fn audit_connectivity(graph: &Graph, index: &GraphIndex) -> ConnectivityReport {
    let mismatches = graph
        .nodes
        .iter()
        .filter_map(|(id, node)| {
            let (observed_fan_in, observed_fan_out) = index.observed_degree(id).unwrap_or((0, 0));
            let declared = &node.metadata;
            if declared.fan_in == observed_fan_in && declared.fan_out == observed_fan_out {
                return None;
            }
            Some(DegreeMismatch {
                id: id.clone(),
                declared_fan_in: declared.fan_in,
                observed_fan_in,
                declared_fan_out: declared.fan_out,
                observed_fan_out,
            })
        })
        .collect();

    ConnectivityReport {
        mismatches,
        dangling_edges: index.dangling_edges().to_vec(),
    }
}
