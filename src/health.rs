use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tracing::{error, info};

async fn alive() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

/// Serves the liveness endpoint; errors are logged so the alert loop keeps running.
pub async fn serve(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Health endpoint could not bind {}: {}", addr, e);
            return;
        }
    };
    info!(%addr, "Health endpoint listening");
    if let Err(e) = axum::serve(listener, router()).await {
        error!("Health endpoint stopped: {}", e);
    }
}
