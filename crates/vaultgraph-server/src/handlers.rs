//! REST API handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use vaultgraph_indexer::{extract_references, DocumentStore, FileEntry, Reference, SearchHit, StoreError};

use crate::{render::render_document, ServerState};

/// Handler error: status plus a plain-text message.
pub type ApiError = (StatusCode, String);

/// A document or other file in the vault
#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub path: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Reference>>,
}

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BacklinksResponse {
    pub path: String,
    pub backlinks: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::InvalidPath(_) => (StatusCode::FORBIDDEN, "Invalid path".to_string()),
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
        other => {
            error!("Storage error: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// Run blocking storage work off the async runtime.
async fn blocking<T, F>(state: &Arc<ServerState>, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&ServerState) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

/// Rebuild after a mutation. The file change has already happened, so a
/// failure here is reported but the previous graph keeps serving.
fn rebuild(state: &ServerState) -> Result<(), ApiError> {
    state.index.build().map(|_| ()).map_err(|e| {
        error!("Rebuild failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("graph rebuild failed: {}", e),
        )
    })
}

/// List every visible file and directory
pub async fn list_files(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<FileEntry>>, ApiError> {
    let entries = blocking(&state, |state| state.store().list_entries().map_err(store_error)).await?;
    Ok(Json(entries))
}

/// Read a file; documents also get rendered HTML and their references
pub async fn read_file(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Result<Json<FileResponse>, ApiError> {
    let response = blocking(&state, move |state| {
        let content = state.store().read_text(&path).map_err(|e| match e {
            StoreError::InvalidPath(_) => store_error(e),
            _ => (StatusCode::NOT_FOUND, "Not found".to_string()),
        })?;

        let config = state.store().config();
        let (html, links) = if config.is_document_name(&path) {
            (
                Some(render_document(&content, &config.document_extension)),
                Some(extract_references(&content)),
            )
        } else {
            (None, None)
        };

        Ok(FileResponse {
            path,
            content,
            html,
            links,
        })
    })
    .await?;

    Ok(Json(response))
}

/// Create or replace a file, then rebuild the graph
pub async fn write_file(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let request: WriteRequest = serde_json::from_slice(&body)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    blocking(&state, move |state| {
        state
            .store()
            .write_text(&path, &request.content)
            .map_err(store_error)?;
        info!("Saved {}", path);
        rebuild(state)
    })
    .await?;

    Ok(Json(StatusResponse { status: "ok" }))
}

/// Delete a file or empty directory, then rebuild the graph
pub async fn delete_file(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    blocking(&state, move |state| {
        state.store().delete(&path).map_err(store_error)?;
        info!("Deleted {}", path);
        rebuild(state)
    })
    .await?;

    Ok(Json(StatusResponse { status: "ok" }))
}

/// The installed graph snapshot
pub async fn get_graph(State(state): State<Arc<ServerState>>) -> Response {
    let graph = state.index.current_graph();
    Json(graph.as_ref()).into_response()
}

/// Sources of every edge pointing at `path`
pub async fn get_backlinks(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Json<BacklinksResponse> {
    let backlinks = state.index.backlinks_of(&path);
    Json(BacklinksResponse { path, backlinks })
}

/// Case-insensitive full-text search over documents
pub async fn search(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query required".to_string()));
    }

    let hits = blocking(&state, move |state| state.store().search(&query).map_err(store_error)).await?;
    Ok(Json(hits))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(health)
}

/// Unknown `/api` paths, including `/api/files/` with no path
pub async fn api_not_found() -> ApiError {
    (StatusCode::NOT_FOUND, "Not found".to_string())
}
