//! Axum router setup

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    assets::static_service,
    auth::require_basic_auth,
    handlers::{
        api_not_found, delete_file, get_backlinks, get_graph, health_check, list_files, read_file,
        search, write_file,
    },
    ServerState,
};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    let api = Router::new()
        .route("/files", get(list_files))
        .route(
            "/files/*path",
            get(read_file).post(write_file).put(write_file).delete(delete_file),
        )
        .route("/graph", get(get_graph))
        .route("/backlinks/*path", get(get_backlinks))
        .route("/search", get(search))
        // Only routes registered above require credentials
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_basic_auth,
        ))
        .route("/health", get(health_check))
        .fallback(api_not_found);

    let static_dir = state.config.static_dir.clone();

    Router::new()
        .nest("/api", api)
        // Web client, with index.html for client-side routes
        .fallback_service(static_service(&static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
