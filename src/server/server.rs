use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Json, Router};
use serde_json::json;
use tracing::info;

use crate::auth::jwt::JwtAuthority;
use crate::auth::store::TokenStore;
use crate::cbr::RateService;
use crate::config::settings::ServiceConfig;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::server::{currency, files, gate, info as info_routes, token};

#[derive(Clone)]
pub struct AppState {
    pub rates: Arc<RateService>,
    pub store: Arc<TokenStore>,
    pub jwt: Arc<JwtAuthority>,
    pub config: Arc<ServiceConfig>,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub async fn new(config: &ServiceConfig) -> Result<Self> {
        let metrics = get_metrics().await;
        Ok(Self {
            rates: Arc::new(RateService::new(&config.upstream)?),
            store: Arc::new(TokenStore::open(config.auth.store_path.as_deref()).await?),
            jwt: Arc::new(JwtAuthority::new(&config.auth)?),
            config: Arc::new(config.clone()),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        })
    }
}

/// Full application router: versioned API plus the metrics endpoint.
/// The currency area sits behind the token gate; token issuing and info
/// stay open, matching the original service.
pub fn router(state: AppState) -> Router {
    let gated_currency = currency::router().layer(middleware::from_fn_with_state(
        state.clone(),
        gate::require_token,
    ));

    let api = Router::new()
        .merge(info_routes::router())
        .nest("/token", token::router())
        .nest("/currency", gated_currency)
        .nest("/file", files::router());

    Router::new()
        .nest(&state.config.server.api_prefix, api)
        .merge(state.metrics_state.router(&state.config.metrics))
        .with_state(state)
}

/// Start the Axum server on the configured address.
pub async fn start(config: &ServiceConfig) -> Result<()> {
    let state = AppState::new(config).await?;
    let app = router(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    get_metrics().await.up.set(1);
    axum::serve(listener, app).await?;

    Ok(())
}

/// FastAPI-style `{"detail": ...}` error body used across the routes.
pub fn api_error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

/// `{total, items}` on data, bare 204 when the list is empty — an empty
/// result is a valid outcome everywhere in this gateway.
pub fn paged_or_no_content<T: serde::Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(crate::cbr::model::Paged::new(items)).into_response()
    }
}
