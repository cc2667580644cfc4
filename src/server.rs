//! HTTP server: routing, serving and graceful shutdown.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    Router,
    extract::{Query, State},
    routing::any,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handler::{Relay, WebhookQuery};

pub const WEBHOOK_PATH: &str = "/jenkins/webhook";

/// Fixed listen address, all interfaces.
pub const LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8180);

/// Routes `/jenkins/webhook` (any method) to `relay`.
pub fn create_router(relay: Relay) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, any(relay_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

async fn relay_webhook(
    State(relay): State<Relay>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> String {
    let query: WebhookQuery = pairs.into_iter().collect();
    relay.handle(query).await.body()
}

/// Serves `relay` on `addr` until Ctrl-C or SIGTERM.
pub async fn start_server(relay: Relay, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = create_router(relay);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received CTRL+C, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }

    warn!("Waiting for in-flight requests to complete");
}
