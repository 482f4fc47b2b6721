//! Typed errors and HTTP mapping.

use crate::response::Envelope;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// One failed field constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("adding an item of weight {item_weight} to a load of {current_load} exceeds capacity {capacity}")]
    OverCapacity {
        capacity: i64,
        current_load: i64,
        item_weight: i64,
    },
    #[error("{0}")]
    BusinessRule(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

/// Detail of an internal error, attached to 500 responses as an extension.
/// The body never carries it; `routes::expose_internal_errors` adds it back in development.
#[derive(Clone, Debug)]
pub struct InternalErrorDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                Envelope::failure(format!("{} not found", entity)),
            ),
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Envelope::failure("Validation failed").with_details(serde_json::json!(details)),
            ),
            AppError::OverCapacity {
                capacity,
                current_load,
                item_weight,
            } => (
                StatusCode::BAD_REQUEST,
                Envelope::failure("Inventory capacity exceeded")
                    .with_message(self.to_string())
                    .with_details(serde_json::json!({
                        "capacity": capacity,
                        "currentLoad": current_load,
                        "itemWeight": item_weight,
                    })),
            ),
            AppError::BusinessRule(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Envelope::failure(msg.clone()))
            }
            AppError::Json(rejection) => (
                rejection.status(),
                Envelope::failure("Invalid JSON body").with_message(rejection.body_text()),
            ),
            AppError::Config(_) | AppError::Db(_) | AppError::Io(_) => {
                tracing::error!(error = %self, "request failed");
                let mut res = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Envelope::failure("Internal server error")),
                )
                    .into_response();
                res.extensions_mut()
                    .insert(InternalErrorDetail(self.to_string()));
                return res;
            }
        };
        (status, Json(body)).into_response()
    }
}
