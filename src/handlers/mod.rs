//! HTTP handlers for heroes, quests, items and hero inventories.

pub mod heroes;
pub mod items;
pub mod quests;

use crate::error::AppError;
use crate::service::validation::RuleSet;
use crate::service::RequestValidator;
use axum::{extract::rejection::JsonRejection, Json};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Raw query string parameters.
pub type Params = HashMap<String, String>;

/// Path id as an integer. Anything else cannot name a row, so it is reported as not found.
pub(crate) fn parse_id(raw: &str, entity: &'static str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::NotFound(entity))
}

pub(crate) fn body_to_map(payload: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    let Json(value) = payload?;
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("Request body must be a JSON object".into())),
    }
}

/// Validate the body against `rules`, then deserialize the normalized body.
pub(crate) fn validated<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
    rules: &RuleSet,
) -> Result<T, AppError> {
    let mut body = body_to_map(payload)?;
    RequestValidator::validate(&mut body, rules)?;
    from_map(body)
}

pub(crate) fn from_map<T: DeserializeOwned>(body: Map<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(body)).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Non-empty text parameter.
pub(crate) fn text_param(params: &Params, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integer parameter; unparseable values count as absent.
pub(crate) fn int_param(params: &Params, key: &str) -> Option<i64> {
    params.get(key).and_then(|s| s.trim().parse().ok())
}

pub(crate) fn page_params(params: &Params) -> crate::sql::Page {
    crate::sql::Page::from_query(
        params.get("limit").map(String::as_str),
        params.get("offset").map(String::as_str),
    )
}
