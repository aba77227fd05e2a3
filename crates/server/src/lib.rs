//! # Ordersmith HTTP API
//!
//! Handles:
//! - `POST /generate_pdf` - order JSON in, PDF attachment out
//! - `GET /health` - liveness check
//! - CORS (permissive, preflight included)
//!
//! Request handling is split from transport: `process` does the
//! JSON-to-PDF work and returns plain status/message pairs, the axum
//! handlers only translate to HTTP.

#![warn(rust_2018_idioms)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use composer::{Composer, OrderRecord};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for all request handlers
#[derive(Clone)]
pub struct AppState {
    pub composer: Arc<Composer>,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate_pdf", post(generate_pdf))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthRes {
    ok: bool,
    message: String,
}

async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "ordersmith is alive".into(),
    })
}

async fn generate_pdf(State(state): State<AppState>, body: Bytes) -> Response {
    match process(&state.composer, &body) {
        Ok(document) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.filename),
                ),
            ],
            document.bytes,
        )
            .into_response(),
        Err((status, message)) => (status, message).into_response(),
    }
}

/// A finished document ready to send
#[derive(Debug)]
pub struct PdfResponse {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Turn a raw request body into a PDF or a status/message pair
pub fn process(composer: &Composer, body: &[u8]) -> Result<PdfResponse, (StatusCode, String)> {
    if body.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No JSON data provided".to_string()));
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid JSON: {e}")))?;

    let order = OrderRecord::from_value(&value).map_err(|e| {
        tracing::warn!("Order validation failed: {e}");
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    let bytes = composer.compose(&order).map_err(|e| {
        if e.is_data_error() {
            tracing::warn!("Order data rejected: {e}");
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        } else {
            tracing::error!("Composition failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            )
        }
    })?;

    Ok(PdfResponse {
        filename: attachment_filename(&order.order_id),
        bytes,
    })
}

/// Attachment filename embedding the order id, restricted to
/// header-safe characters
fn attachment_filename(order_id: &str) -> String {
    let safe: String = order_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if safe.is_empty() {
        "order_summary.pdf".to_string()
    } else {
        format!("order_summary_{safe}.pdf")
    }
}
