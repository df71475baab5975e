//! HTTP transport for the dictionary and the daily practice set.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/get-daily-tasks` | today's practice set |
//! | GET | `/dictionary` | every stored entry |
//! | POST | `/add-to-db` | add an entry (admin) |
//! | DELETE | `/dictionary/{id}` | remove an entry (admin) |
//! | GET | `/health` | liveness |
//!
//! Admin routes require the shared secret in the `X-Admin-Token` header when
//! one is configured.
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    http::{
        header::{HeaderName, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

mod auth;
mod error;
mod routes;
mod state;

pub use auth::ADMIN_TOKEN_HEADER;
pub use error::AppError;
pub use state::AppState;

use auth::require_admin;
use routes::{
    add_entry_handler, daily_tasks_handler, delete_entry_handler, health_handler,
    list_entries_handler,
};

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/add-to-db", post(add_entry_handler))
        .route("/dictionary/{id}", delete(delete_entry_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/get-daily-tasks", get(daily_tasks_handler))
        .route("/dictionary", get(list_entries_handler))
        .route("/health", get(health_handler))
        .merge(admin)
        .layer(cors())
        .with_state(state)
}

/// Browser front-ends are served from anywhere, so any origin may call us.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-admin-token")])
        .max_age(Duration::from_secs(60 * 60))
}

/// Bind `address` and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<AppState>, address: &str) -> Result<()> {
    if state.admin_token.is_none() {
        warn!("No admin token configured, add and delete routes are open");
    }

    let app = router(state);

    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
