use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::helpers::time::{parse_boundary_date, today_moscow};
use crate::observability::metrics::get_metrics;
use crate::server::server::{api_error, paged_or_no_content, AppState};

/// The upstream has no batch endpoint; the boundary caps explicit dynamics
/// requests so the uncapped fan-out behind it stays small.
pub const MAX_DYNAMICS_CODES: usize = 15;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/code-reference", get(code_reference))
        .route("/exchange-rates/daily", get(exchange_rates_daily))
        .route("/exchange-rates/dynamics", post(exchange_rates_dynamics))
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
    pub currency_iso_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DynamicsQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DynamicsRequest {
    pub cb_codes: Vec<String>,
}

/// Full currency-code reference, enrichment fields included.
async fn code_reference(State(state): State<AppState>) -> Response {
    let metrics = get_metrics().await;
    metrics.gateway_requests.with_label_values(&["code_reference"]).inc();
    let start = Instant::now();

    let codes = state.rates.catalog().await.into_codes();

    metrics
        .gateway_duration
        .with_label_values(&["code_reference"])
        .observe(start.elapsed().as_secs_f64());
    paged_or_no_content(codes)
}

/// One day's quotes, optionally narrowed to a single ISO code.
async fn exchange_rates_daily(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> Response {
    let metrics = get_metrics().await;
    metrics.gateway_requests.with_label_values(&["daily"]).inc();
    let start = Instant::now();

    let date = match parse_optional_date(query.date.as_deref(), "date") {
        Ok(date) => date,
        Err(response) => return response,
    };
    if let Some(d) = date {
        if d > today_moscow() {
            return api_error(StatusCode::BAD_REQUEST, "date > current date");
        }
    }

    let records = state
        .rates
        .daily(date, query.currency_iso_code.as_deref())
        .await;

    metrics
        .gateway_duration
        .with_label_values(&["daily"])
        .observe(start.elapsed().as_secs_f64());
    paged_or_no_content(records)
}

/// Rate dynamics for 1..=15 internal codes over a date range.
async fn exchange_rates_dynamics(
    State(state): State<AppState>,
    Query(query): Query<DynamicsQuery>,
    Json(request): Json<DynamicsRequest>,
) -> Response {
    let metrics = get_metrics().await;
    metrics.gateway_requests.with_label_values(&["dynamics"]).inc();
    let start = Instant::now();

    if request.cb_codes.is_empty() || request.cb_codes.len() > MAX_DYNAMICS_CODES {
        return api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "cb_codes must contain between 1 and 15 codes",
        );
    }

    let date_from = match parse_optional_date(query.date_from.as_deref(), "date_from") {
        Ok(date) => date,
        Err(response) => return response,
    };
    let date_to = match parse_optional_date(query.date_to.as_deref(), "date_to") {
        Ok(date) => date,
        Err(response) => return response,
    };

    // Caller input errors stop here; the aggregator below never rejects.
    if let (Some(from), None) = (date_from, date_to) {
        if from > today_moscow() {
            return api_error(StatusCode::BAD_REQUEST, "date_from > current date");
        }
    }
    if let (Some(from), Some(to)) = (date_from, date_to) {
        if from > to {
            return api_error(StatusCode::BAD_REQUEST, "date_from > date_to");
        }
    }

    let records = state
        .rates
        .dynamics(date_from, date_to, Some(request.cb_codes))
        .await;

    metrics
        .gateway_duration
        .with_label_values(&["dynamics"])
        .observe(start.elapsed().as_secs_f64());
    paged_or_no_content(records)
}

fn parse_optional_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, Response> {
    match raw {
        None => Ok(None),
        Some(text) => parse_boundary_date(text).map(Some).ok_or_else(|| {
            api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                &format!("{} must be an ISO date (YYYY-MM-DD)", field),
            )
        }),
    }
}
