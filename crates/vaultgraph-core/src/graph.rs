//! Link graph snapshot: ordered nodes and edges keyed by canonical path

use crate::model::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One complete build of the link graph.
///
/// A snapshot is assembled by the indexer and then shared read-only; the
/// mutating methods below exist for that assembly step only.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "GraphRecord")]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip_serializing)]
    positions: HashMap<String, usize>,
}

/// Wire shape of a [`Graph`], without the id index.
#[derive(Deserialize)]
struct GraphRecord {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl From<GraphRecord> for Graph {
    fn from(record: GraphRecord) -> Self {
        let mut graph = Graph::new();
        for node in record.nodes {
            graph.insert_node(node);
        }
        graph.edges = record.edges;
        graph
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.nodes.len())
            .field("edge_count", &self.edges.len())
            .finish()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            nodes: Vec::new(),
            edges: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Insert a node unless one with the same id exists. Returns whether it
    /// was inserted; the first node registered for an id wins.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.positions.contains_key(&node.id) {
            return false;
        }
        self.positions.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Append an edge. Duplicates and dangling targets are allowed.
    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Reorder nodes lexicographically by id. Edge order is untouched.
    pub fn sort_nodes_by_id(&mut self) {
        self.nodes.sort_by(|a, b| a.id.cmp(&b.id));
        self.positions = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect();
    }

    /// All nodes, in snapshot order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.positions.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Get all nodes of a specific kind.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Get all incoming edges to a target id, in edge order.
    pub fn edges_to<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == target)
    }

    /// Sources of every edge whose target equals `target` exactly.
    ///
    /// No normalization is applied; callers pass a canonical id. One entry
    /// per edge, so a document linking twice shows up twice.
    pub fn backlinks(&self, target: &str) -> Vec<String> {
        self.edges_to(target).map(|e| e.source.clone()).collect()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
