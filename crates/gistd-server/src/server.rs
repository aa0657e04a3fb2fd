//! HTTP server implementation using Axum.

use crate::handlers::{
    create_gist, delete_gist, get_gist, get_star, handle_health, list_gists, search_gists,
    star_gist, unstar_gist, update_gist,
};
use axum::{
    routing::{get, put},
    Router,
};
use gistd_core::{GistClient, SearchAggregator, Settings};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    /// Typed Gist API client (pass-through routes)
    pub client: Arc<GistClient>,
    /// Search aggregation pipeline over the same client
    pub aggregator: SearchAggregator<GistClient>,
}

/// Start the HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(settings: Settings, host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let client = Arc::new(GistClient::new(&settings)?);
    let aggregator = SearchAggregator::new(client.clone());
    let state = Arc::new(AppState { client, aggregator });

    // Configure CORS for the browser frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/gists/search", get(search_gists))
        .route("/api/gists", get(list_gists).post(create_gist))
        .route(
            "/api/gists/:id",
            get(get_gist).patch(update_gist).delete(delete_gist),
        )
        .route(
            "/api/gists/:id/star",
            put(star_gist).delete(unstar_gist).get(get_star),
        )
        .layer(cors)
        .with_state(state);

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    // Bind to the address
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    Ok(actual_addr)
}
