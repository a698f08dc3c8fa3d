use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod controller;
pub mod frontend;
pub mod handlers;
pub mod page;
pub mod render;
pub mod state;
pub mod view;

pub use controller::{PipelineOutcome, ProfileController, SearchController};
pub use frontend::Frontend;
pub use state::AppState;
pub use view::{MemoryPanel, Page, PanelContent, PanelView};

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/profile_panel", get(handlers::profile_panel))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Serves the page adapter until the listener fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Company finder listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}
