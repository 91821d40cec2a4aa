//! HTTP server for vault files, the link graph and backlinks

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tracing::info;
use vaultgraph_indexer::{FsStore, GraphIndex};

pub mod assets;
pub mod auth;
pub mod handlers;
pub mod render;
pub mod router;

#[cfg(test)]
mod tests;

/// Username and password required for the `/api` routes.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` disables authentication.
    pub credentials: Option<Credentials>,
    /// Directory holding the web client.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            credentials: None,
            static_dir: PathBuf::from("./static"),
        }
    }
}

/// Shared state handed to every handler
#[derive(Debug)]
pub struct ServerState {
    pub index: Arc<GraphIndex<FsStore>>,
    pub config: ServerConfig,
}

impl ServerState {
    pub fn new(index: Arc<GraphIndex<FsStore>>, config: ServerConfig) -> Self {
        Self { index, config }
    }

    pub fn store(&self) -> &FsStore {
        self.index.store()
    }
}

/// The vault server
pub struct VaultServer {
    state: Arc<ServerState>,
}

impl VaultServer {
    pub fn new(index: Arc<GraphIndex<FsStore>>, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(ServerState::new(index, config)),
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    pub fn router(&self) -> Router {
        router::create_router(self.state())
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.state.config.host, self.state.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Listening on http://{}", addr);
        info!("Vault: {}", self.state.store().root().display());
        info!("Static dir: {}", self.state.config.static_dir.display());
        if self.state.config.credentials.is_none() {
            info!("Authentication disabled");
        }

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
