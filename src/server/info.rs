use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::server::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/info", get(info))
}

async fn info() -> Json<serde_json::Value> {
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "host": hostname,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
