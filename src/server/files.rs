use std::collections::HashSet;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::server::server::{api_error, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/download", get(download_file))
        .route("/upload-bytes", post(upload_bytes))
        .route("/upload-file", post(upload_file))
}

/// Serve the configured report file as an attachment.
async fn download_file(State(state): State<AppState>) -> Response {
    let Some(path) = state.config.files.download_path.clone() else {
        return api_error(StatusCode::NOT_FOUND, "no download file configured");
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let filename = std::path::Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "download".to_string());
            (
                [
                    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            warn!("download read failed: {}", e);
            api_error(StatusCode::NOT_FOUND, "file not found")
        }
    }
}

/// Echo endpoint: raw body accepted as-is.
async fn upload_bytes(body: Bytes) -> Response {
    Json(json!({ "file_bytes": String::from_utf8_lossy(&body) })).into_response()
}

/// Accept one multipart file (CSV or JSON array), parse it into records and
/// drop duplicate rows. XLSX from the original service is not supported.
async fn upload_file(mut multipart: Multipart) -> Response {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return api_error(StatusCode::BAD_REQUEST, "no file in request"),
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let content_type = field.content_type().unwrap_or_default().to_string();
    let data = match field.bytes().await {
        Ok(data) => data,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let rows = match content_type.as_str() {
        "text/csv" => match parse_csv(&data) {
            Ok(rows) => rows,
            Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
        },
        "application/json" => match serde_json::from_slice::<Vec<Value>>(&data) {
            Ok(rows) => rows,
            Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
        },
        other => {
            return api_error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                &format!("unsupported file format '{}'; supported: CSV, JSON", other),
            )
        }
    };

    Json(json!({ "data": dedup_rows(rows) })).into_response()
}

fn parse_csv(data: &[u8]) -> anyhow::Result<Vec<Value>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Map::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), Value::String(value.to_string()));
        }
        rows.push(Value::Object(row));
    }
    Ok(rows)
}

/// Order-preserving duplicate removal, keyed on the serialized row.
fn dedup_rows(rows: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.to_string()))
        .collect()
}
