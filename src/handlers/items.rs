//! Item CRUD and search handlers. Writes go through the inventory service so the capacity rule holds.

use crate::error::AppError;
use crate::handlers::{page_params, parse_id, text_param, validated, Params};
use crate::models::{ItemPatch, ItemSearch, NewItem};
use crate::response::{
    success_created, success_many, success_message, success_one_ok, success_page, success_updated,
    Pagination,
};
use crate::service::validation::{ITEM_CREATE, ITEM_UPDATE};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub const TYPE_REQUIRED: &str = "Type query parameter is required";

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, AppError> {
    let page = page_params(&params);
    let repo = state.items();
    let items = repo
        .find_all(
            page,
            params.get("sort").map(String::as_str),
            params.get("order").map(String::as_str),
        )
        .await?;
    let total = repo.count().await?;
    Ok(success_page(
        items,
        Pagination {
            total,
            limit: page.limit,
            offset: page.offset,
        },
    ))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, AppError> {
    let item_type = text_param(&params, "type").ok_or_else(|| AppError::BadRequest(TYPE_REQUIRED.into()))?;
    let criteria = ItemSearch {
        item_type: Some(item_type),
        page: page_params(&params),
    };
    let items = state.items().search(&criteria).await?;
    Ok(success_many(items))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Item")?;
    let item = state.items().find_by_id(id).await?.ok_or(AppError::NotFound("Item"))?;
    Ok(success_one_ok(item))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let new: NewItem = validated(payload, &ITEM_CREATE)?;
    let item = state.inventory().create_item(new).await?;
    Ok(success_created(item, "Item created successfully"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Item")?;
    let patch: ItemPatch = validated(payload, &ITEM_UPDATE)?;
    let item = state
        .inventory()
        .update_item(id, patch)
        .await?
        .ok_or(AppError::NotFound("Item"))?;
    Ok(success_updated(item, "Item updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Item")?;
    if !state.items().delete(id).await? {
        return Err(AppError::NotFound("Item"));
    }
    Ok(success_message("Item deleted successfully"))
}
