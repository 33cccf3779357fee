//! HTTP front for a Parley session.

pub mod logging;
pub mod routes;

use parley_application::SessionFactory;
use parley_core::config::ParleyConfig;
use routes::{AppState, build_router};
use std::sync::Arc;

/// Start the server and run until the listener fails.
pub async fn start_server(config: ParleyConfig) -> anyhow::Result<()> {
    let bind = config.server.bind.clone();
    let manager = SessionFactory::new(config).create_manager()?;
    let router = build_router(AppState {
        manager: Arc::new(manager),
    });

    tracing::info!("Starting Parley on {}", bind);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
