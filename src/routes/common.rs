//! Common routes: health, readiness, version. Plus the JSON 404 and development error detail.

use crate::config::Settings;
use crate::error::InternalErrorDetail;
use crate::response::Envelope;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    match sqlx::query("SELECT 1").fetch_optional(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadyBody {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyBody {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, GET /ready (database round trip), GET /version.
pub fn common_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
}

/// Fallback for unmatched paths.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": "Endpoint not found",
            "availableEndpoints": {
                "documentation": "GET /",
                "heroes": "GET /heroes",
                "quests": "GET /quests",
                "items": "GET /items"
            }
        })),
    )
}

/// In development, 500 responses carry the internal error text as `message`.
pub async fn expose_internal_errors(
    State(settings): State<Arc<Settings>>,
    req: Request,
    next: Next,
) -> Response {
    let res = next.run(req).await;
    if !settings.is_development() {
        return res;
    }
    match res.extensions().get::<InternalErrorDetail>() {
        Some(InternalErrorDetail(detail)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Envelope::failure("Internal server error").with_message(detail.clone())),
        )
            .into_response(),
        None => res,
    }
}
