//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// `{ success, data?, error?, message?, pagination?, count?, details? }`
#[derive(Debug, Serialize)]
pub struct Envelope<T = Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> Envelope<T> {
    fn empty(success: bool) -> Self {
        Envelope {
            success,
            data: None,
            error: None,
            message: None,
            pagination: None,
            count: None,
            details: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Envelope {
            data: Some(data),
            ..Self::empty(true)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl Envelope<Value> {
    pub fn failure(error: impl Into<String>) -> Self {
        Envelope {
            error: Some(error.into()),
            ..Self::empty(false)
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self::empty(true).with_message(message)
    }
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope::ok(data)))
}

pub fn success_created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::ok(data).with_message(message)))
}

pub fn success_updated<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope::ok(data).with_message(message)))
}

pub fn success_page<T: Serialize>(data: Vec<T>, pagination: Pagination) -> (StatusCode, Json<Envelope<Vec<T>>>) {
    let mut body = Envelope::ok(data);
    body.pagination = Some(pagination);
    (StatusCode::OK, Json(body))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Envelope<Vec<T>>>) {
    let count = data.len();
    let mut body = Envelope::ok(data);
    body.count = Some(count);
    (StatusCode::OK, Json(body))
}

pub fn success_message(message: &str) -> (StatusCode, Json<Envelope>) {
    (StatusCode::OK, Json(Envelope::message_only(message)))
}
