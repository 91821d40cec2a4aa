//! CLI command implementations

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vaultgraph_core::NodeKind;
use vaultgraph_indexer::{FsStore, GraphIndex};
use vaultgraph_server::{Credentials, ServerConfig, VaultServer};
use vaultgraph_watcher::WatcherService;

/// Build the index for `vault`, failing if the vault cannot be traversed.
fn build_index(vault: &Path) -> anyhow::Result<Arc<GraphIndex<FsStore>>> {
    let index = Arc::new(GraphIndex::new(FsStore::new(vault)));
    index
        .build()
        .with_context(|| format!("failed to index vault {}", vault.display()))?;
    Ok(index)
}

pub async fn serve(
    vault: PathBuf,
    host: String,
    port: u16,
    credentials: Option<Credentials>,
    static_dir: PathBuf,
    watch: bool,
) -> anyhow::Result<()> {
    tracing::info!("Initializing graph...");
    let index = {
        let vault = vault.clone();
        tokio::task::spawn_blocking(move || build_index(&vault)).await??
    };

    if watch {
        let mut watcher = WatcherService::new(&vault, Arc::clone(&index))?;
        watcher.start_watching()?;
        tokio::spawn(async move {
            if let Err(e) = watcher.process_events().await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let config = ServerConfig {
        host,
        port,
        credentials,
        static_dir,
    };
    VaultServer::new(index, config).start().await
}

pub fn index(vault: PathBuf, json: bool) -> anyhow::Result<()> {
    let index = build_index(&vault)?;
    let graph = index.current_graph();

    if json {
        println!("{}", serde_json::to_string_pretty(graph.as_ref())?);
        return Ok(());
    }

    let documents = graph.nodes_of_kind(NodeKind::File).count();
    let directories = graph.nodes_of_kind(NodeKind::Directory).count();
    let dangling = graph
        .edges()
        .iter()
        .filter(|edge| !graph.contains_node(&edge.target))
        .count();

    println!("documents:   {}", documents);
    println!("directories: {}", directories);
    println!("links:       {}", graph.edge_count());
    println!("dangling:    {}", dangling);
    Ok(())
}

pub fn backlinks(vault: PathBuf, id: &str) -> anyhow::Result<()> {
    let index = build_index(&vault)?;
    for source in index.backlinks_of(id) {
        println!("{}", source);
    }
    Ok(())
}
