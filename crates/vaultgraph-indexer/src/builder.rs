//! Build arena that turns documents and their references into a snapshot

use crate::extractor::{canonical_directory, canonical_file, Reference};
use std::collections::BTreeSet;
use vaultgraph_core::{Edge, Graph, Node};

/// Owned, single-use accumulator for one build.
///
/// Nothing here is visible to readers until [`SnapshotBuilder::finish`]
/// hands the finished graph to the index.
#[derive(Debug)]
pub struct SnapshotBuilder {
    extension: String,
    graph: Graph,
    pending_directories: BTreeSet<String>,
}

impl SnapshotBuilder {
    pub fn new(extension: impl Into<String>) -> Self {
        SnapshotBuilder {
            extension: extension.into(),
            graph: Graph::new(),
            pending_directories: BTreeSet::new(),
        }
    }

    /// Register a real document under its relative path.
    pub fn add_document(&mut self, id: &str) {
        self.graph.insert_node(Node::file(id, &self.extension));
    }

    /// Record one outgoing edge for `source`. Directory targets are
    /// remembered so a node can be synthesized for them later; file
    /// targets only get a node if the document exists.
    pub fn add_reference(&mut self, source: &str, reference: &Reference) {
        let target = if reference.is_directory {
            let directory = canonical_directory(&reference.target);
            self.pending_directories.insert(directory.clone());
            directory
        } else {
            canonical_file(&reference.target, &self.extension)
        };
        self.graph.push_edge(Edge::new(source, target));
    }

    /// Synthesize directory nodes and produce the snapshot, nodes ordered
    /// by id.
    pub fn finish(mut self) -> Graph {
        for directory in std::mem::take(&mut self.pending_directories) {
            if !self.graph.contains_node(&directory) {
                self.graph.insert_node(Node::directory(directory));
            }
        }
        self.graph.sort_nodes_by_id();
        self.graph
    }
}
