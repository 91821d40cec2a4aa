//! Filesystem watcher implementation

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use vaultgraph_indexer::{DocumentStore, FsStore, GraphIndex, IndexConfig};

/// How long to let a burst of events settle before rebuilding.
const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// File or directory created
    Created(PathBuf),
    /// File or directory modified or renamed
    Modified(PathBuf),
    /// File or directory removed
    Removed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Created(path) | WatchEvent::Modified(path) | WatchEvent::Removed(path) => {
                path
            }
        }
    }
}

/// Whether a change at `path` can affect the graph.
///
/// Anything under a hidden entry is ignored. Otherwise documents and
/// directories count, and so does any path that no longer exists: a moved
/// or removed directory cannot be stat'ed, and its name may contain a dot.
pub fn is_relevant(root: &Path, path: &Path, config: &IndexConfig) -> bool {
    let hidden = match path.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .any(|c| config.is_hidden_name(&c.as_os_str().to_string_lossy())),
        Err(_) => path
            .file_name()
            .is_some_and(|name| config.is_hidden_name(&name.to_string_lossy())),
    };
    if hidden {
        return false;
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if config.is_document_name(&name) || path.is_dir() {
        return true;
    }
    !path.exists()
}

/// Recursive watcher over a vault directory
pub struct VaultWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::UnboundedReceiver<WatchEvent>,
    root_path: PathBuf,
}

impl VaultWatcher {
    /// Create a watcher for `root_path`. Nothing is watched until
    /// [`watch`](Self::watch) is called.
    pub fn new(root_path: impl AsRef<Path>, config: IndexConfig) -> Result<Self> {
        let root_path = root_path.as_ref();
        // notify reports absolute paths, so compare against the resolved root
        let root_path = root_path
            .canonicalize()
            .unwrap_or_else(|_| root_path.to_path_buf());
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let filter_root = root_path.clone();
        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    debug!("File system event: {:?}", event);
                    Self::handle_notify_event(event, &filter_root, &config, &event_tx);
                }
                Err(e) => {
                    error!("File system watch error: {}", e);
                }
            }
        })?;

        Ok(Self {
            watcher,
            event_rx,
            root_path,
        })
    }

    fn handle_notify_event(
        event: notify::Event,
        root: &Path,
        config: &IndexConfig,
        event_tx: &mpsc::UnboundedSender<WatchEvent>,
    ) {
        let make: fn(PathBuf) -> WatchEvent = match event.kind {
            notify::EventKind::Create(_) => WatchEvent::Created,
            notify::EventKind::Modify(_) => WatchEvent::Modified,
            notify::EventKind::Remove(_) => WatchEvent::Removed,
            _ => return,
        };

        for path in event.paths {
            if !is_relevant(root, &path, config) {
                continue;
            }
            if let Err(e) = event_tx.send(make(path)) {
                warn!("Failed to queue watch event: {}", e);
            }
        }
    }

    /// Start watching the vault recursively
    pub fn watch(&mut self) -> Result<()> {
        self.watcher.watch(&self.root_path, RecursiveMode::Recursive)?;
        info!("Watching vault: {}", self.root_path.display());
        Ok(())
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Get the event receiver
    pub fn event_receiver(&mut self) -> &mut mpsc::UnboundedReceiver<WatchEvent> {
        &mut self.event_rx
    }
}

/// Rebuilds the index whenever the vault changes
pub struct WatcherService<S: DocumentStore + 'static = FsStore> {
    watcher: VaultWatcher,
    index: Arc<GraphIndex<S>>,
}

impl<S: DocumentStore + 'static> WatcherService<S> {
    /// Create a service for the vault at `root_path`, using the index's
    /// naming rules to decide which changes matter.
    pub fn new(root_path: impl AsRef<Path>, index: Arc<GraphIndex<S>>) -> Result<Self> {
        let config = index.store().config().clone();
        Ok(Self {
            watcher: VaultWatcher::new(root_path, config)?,
            index,
        })
    }

    /// Start watching the vault directory
    pub fn start_watching(&mut self) -> Result<()> {
        self.watcher.watch()
    }

    /// Process events until the watcher shuts down. Every event already
    /// queued when a rebuild starts is folded into that rebuild.
    pub async fn process_events(mut self) -> Result<()> {
        while let Some(event) = self.watcher.event_receiver().recv().await {
            debug!("Change detected: {}", event.path().display());
            tokio::time::sleep(SETTLE_DELAY).await;

            let mut changes = 1usize;
            while let Ok(event) = self.watcher.event_receiver().try_recv() {
                debug!("Batched change: {}", event.path().display());
                changes += 1;
            }
            Self::rebuild(Arc::clone(&self.index), changes).await;
        }

        Ok(())
    }

    /// Failures are logged; the previous snapshot keeps serving.
    async fn rebuild(index: Arc<GraphIndex<S>>, changes: usize) {
        match tokio::task::spawn_blocking(move || index.build()).await {
            Ok(Ok(graph)) => info!(
                "Rebuilt graph after {} change(s): {} nodes, {} edges",
                changes,
                graph.node_count(),
                graph.edge_count()
            ),
            Ok(Err(e)) => error!("Rebuild failed: {}", e),
            Err(e) => error!("Rebuild task failed: {}", e),
        }
    }
}
