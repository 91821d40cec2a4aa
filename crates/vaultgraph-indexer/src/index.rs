//! Graph index: full rebuilds and snapshot queries

use crate::builder::SnapshotBuilder;
use crate::error::IndexError;
use crate::extractor::extract_references;
use crate::store::{DocumentStore, FsStore, WalkControl};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use vaultgraph_core::Graph;

/// Owns the installed snapshot and rebuilds it from a [`DocumentStore`].
///
/// Readers get an `Arc` to the installed graph and never see a build in
/// progress. Builds run one at a time; each one assembles a fresh graph
/// without holding the snapshot lock and only takes the write lock to swap
/// it in.
pub struct GraphIndex<S: DocumentStore = FsStore> {
    store: S,
    current: RwLock<Arc<Graph>>,
    build_lock: Mutex<()>,
}

impl<S: DocumentStore> std::fmt::Debug for GraphIndex<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphIndex")
            .field("location", &self.store.location())
            .field("graph", &*self.current.read())
            .finish()
    }
}

impl<S: DocumentStore> GraphIndex<S> {
    /// Create an index with an empty snapshot. Call [`build`](Self::build)
    /// to populate it.
    pub fn new(store: S) -> Self {
        GraphIndex {
            store,
            current: RwLock::new(Arc::new(Graph::new())),
            build_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rebuild the whole graph and install it.
    ///
    /// Fails only when the tree cannot be traversed; the previous snapshot
    /// then stays installed. Documents that cannot be read are skipped.
    pub fn build(&self) -> Result<Arc<Graph>, IndexError> {
        let _guard = self.build_lock.lock();
        let started = Instant::now();
        let config = self.store.config();
        let mut builder = SnapshotBuilder::new(config.document_extension.as_str());
        let mut skipped = 0usize;

        self.store
            .walk(&mut |entry| {
                if entry.is_hidden {
                    return WalkControl::SkipSubtree;
                }
                if entry.is_dir || !config.is_document_name(&entry.name) {
                    return WalkControl::Continue;
                }

                let text = match self.store.read_text(&entry.relative_path) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Skipping unreadable document {}: {}", entry.relative_path, e);
                        skipped += 1;
                        return WalkControl::Continue;
                    }
                };

                builder.add_document(&entry.relative_path);
                let references = extract_references(&text);
                debug!("{}: {} references", entry.relative_path, references.len());
                for reference in &references {
                    builder.add_reference(&entry.relative_path, reference);
                }
                WalkControl::Continue
            })
            .map_err(|source| IndexError::Traversal {
                root: self.store.location(),
                source,
            })?;

        let graph = Arc::new(builder.finish());
        *self.current.write() = Arc::clone(&graph);

        info!(
            "Indexed {} nodes, {} edges in {:?} ({} unreadable)",
            graph.node_count(),
            graph.edge_count(),
            started.elapsed(),
            skipped
        );
        Ok(graph)
    }

    /// The installed snapshot.
    pub fn current_graph(&self) -> Arc<Graph> {
        Arc::clone(&self.current.read())
    }

    /// Sources of every edge targeting `id` in the installed snapshot.
    pub fn backlinks_of(&self, id: &str) -> Vec<String> {
        self.current.read().backlinks(id)
    }
}
