use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::observability::metrics::get_metrics;
use crate::server::server::{api_error, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get", get(get_token))
        .route("/create-refresh", post(create_or_refresh_token))
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub email: String,
}

/// Look up the previously issued token for an e-mail.
async fn get_token(State(state): State<AppState>, Query(query): Query<TokenRequest>) -> Response {
    let email = match checked_email(query.email) {
        Ok(email) => email,
        Err(response) => return response,
    };

    match state.store.get_by_email(&email).await {
        Some(token) => Json(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            email,
        })
        .into_response(),
        None => api_error(StatusCode::FORBIDDEN, "Token not found"),
    }
}

/// Issue a fresh token for the e-mail and upsert it into the store,
/// replacing whatever was there.
async fn create_or_refresh_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Response {
    let email = match checked_email(request.email) {
        Ok(email) => email,
        Err(response) => return response,
    };

    let token = match state.jwt.issue(&email) {
        Ok(token) => token,
        Err(e) => return api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };

    if let Err(e) = state.store.upsert(&email, &token).await {
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
    }

    get_metrics().await.tokens_issued.inc();
    info!("token issued for {}", email);

    Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        email,
    })
    .into_response()
}

fn checked_email(email: Option<String>) -> Result<String, Response> {
    let Some(email) = email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty()) else {
        return Err(api_error(StatusCode::FORBIDDEN, "Email is required"));
    };

    let shape = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    if !shape.is_match(&email) {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "value is not a valid email address",
        ));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized_and_checked() {
        assert_eq!(
            checked_email(Some(" User@Example.COM ".into())).unwrap(),
            "user@example.com"
        );
        assert!(checked_email(None).is_err());
        assert!(checked_email(Some("".into())).is_err());
        assert!(checked_email(Some("not-an-email".into())).is_err());
        assert!(checked_email(Some("a b@example.com".into())).is_err());
    }
}
