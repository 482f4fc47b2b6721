//! Hero CRUD, search and inventory handlers.

use crate::error::AppError;
use crate::handlers::{body_to_map, from_map, int_param, page_params, parse_id, text_param, validated, Params};
use crate::models::{HeroPatch, HeroSearch, NewHero, NewItem};
use crate::response::{
    success_created, success_many, success_message, success_one_ok, success_page, success_updated,
    Pagination,
};
use crate::service::validation::{HERO_CREATE, HERO_UPDATE, ITEM_CREATE};
use crate::service::{InventoryAddition, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub const WEIGHT_REQUIRED: &str = "Weight is required to add a new item";

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, AppError> {
    let page = page_params(&params);
    let repo = state.heroes();
    let heroes = repo
        .find_all(
            page,
            params.get("sort").map(String::as_str),
            params.get("order").map(String::as_str),
        )
        .await?;
    let total = repo.count().await?;
    Ok(success_page(
        heroes,
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
    let criteria = HeroSearch {
        name: text_param(&params, "name"),
        class: text_param(&params, "class"),
        min_level: int_param(&params, "minLevel"),
        max_level: int_param(&params, "maxLevel"),
        page: page_params(&params),
    };
    let heroes = state.heroes().search(&criteria).await?;
    Ok(success_many(heroes))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Hero")?;
    let hero = state.heroes().find_by_id(id).await?.ok_or(AppError::NotFound("Hero"))?;
    Ok(success_one_ok(hero))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let new: NewHero = validated(payload, &HERO_CREATE)?;
    let hero = state.heroes().create(&new).await?;
    Ok(success_created(hero, "Hero created successfully"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Hero")?;
    let patch: HeroPatch = validated(payload, &HERO_UPDATE)?;
    let hero = state
        .heroes()
        .update(id, patch)
        .await?
        .ok_or(AppError::NotFound("Hero"))?;
    Ok(success_updated(hero, "Hero updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Hero")?;
    if !state.heroes().delete(id).await? {
        return Err(AppError::NotFound("Hero"));
    }
    Ok(success_message("Hero deleted successfully"))
}

pub async fn inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Hero")?;
    let items = state.inventory().list(id).await?;
    Ok(success_many(items))
}

/// `{ "itemId": n }` moves an existing item; otherwise the body describes a new item.
fn addition(payload: Result<Json<Value>, JsonRejection>) -> Result<InventoryAddition, AppError> {
    let mut body = body_to_map(payload)?;
    match body.get("itemId") {
        None | Some(Value::Null) => {}
        Some(raw) => {
            let item_id = match raw {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            return item_id
                .map(InventoryAddition::Existing)
                .ok_or_else(|| AppError::validation("itemId", "Item id must be an integer"));
        }
    }
    if matches!(body.get("weight"), None | Some(Value::Null)) {
        return Err(AppError::BusinessRule(WEIGHT_REQUIRED.into()));
    }
    body.remove("hero_id");
    RequestValidator::validate(&mut body, &ITEM_CREATE)?;
    let new: NewItem = from_map(body)?;
    Ok(InventoryAddition::New(new))
}

pub async fn add_to_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Hero")?;
    let addition = addition(payload)?;
    let item = state.inventory().add(id, addition).await?;
    Ok(success_created(item, "Item added to inventory"))
}
