use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::server::server::{api_error, AppState};

/// Token gate in front of the currency routes. The `Authorization` header
/// carries the raw issued token (no scheme prefix).
///
/// 401 when the header is absent or the token was never issued by this
/// service; 403 when the stored token no longer decodes as a valid JWT.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let header_token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let Some(token) = header_token else {
        return api_error(StatusCode::UNAUTHORIZED, "Missing or invalid Token");
    };

    if !state.store.contains_token(token).await {
        debug!("rejected token unknown to the store");
        return api_error(StatusCode::UNAUTHORIZED, "Missing or invalid Token");
    }

    if state.jwt.validate(token).is_err() {
        return api_error(StatusCode::FORBIDDEN, "Invalid Token, not a valid JWT");
    }

    next.run(request).await
}
