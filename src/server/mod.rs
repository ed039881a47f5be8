//! Tool server - HTTP front end for the bridge
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/health` | `{"status":"ok"}` |
//! | GET | `/` | service descriptor |
//! | POST | `/tool_call` | `{"results": ...}` or 400 `{"error": ...}` |
//!
//! Requests are independent; the only shared state is the read-only
//! [`AppContext`] built at startup.

mod handlers;
mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::{Error, Result};
use crate::mcp::ToolBridge;

pub use handlers::{health, root, tool_call, AppError};
pub use middleware::log_request;

/// Capability handles shared by all requests
#[derive(Clone)]
pub struct AppContext {
    pub bridge: Arc<ToolBridge>,
}

impl AppContext {
    pub fn new(bridge: ToolBridge) -> Self {
        AppContext {
            bridge: Arc::new(bridge),
        }
    }
}

/// Build the application router
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/tool_call", post(tool_call))
        .with_state(ctx)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(log_request))
                .layer(CorsLayer::permissive()),
        )
}

/// Bind `addr` and serve until Ctrl+C
pub async fn serve(ctx: AppContext, addr: SocketAddr) -> Result<()> {
    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("MCP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
