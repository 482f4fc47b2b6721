//! Quest CRUD and search handlers.

use crate::error::AppError;
use crate::handlers::{int_param, page_params, parse_id, text_param, validated, Params};
use crate::models::{NewQuest, QuestPatch, QuestSearch};
use crate::response::{
    success_created, success_many, success_message, success_one_ok, success_page, success_updated,
    Pagination,
};
use crate::service::validation::{QUEST_CREATE, QUEST_UPDATE};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<impl IntoResponse, AppError> {
    let page = page_params(&params);
    let repo = state.quests();
    let quests = repo
        .find_all(
            page,
            params.get("sort").map(String::as_str),
            params.get("order").map(String::as_str),
        )
        .await?;
    let total = repo.count().await?;
    Ok(success_page(
        quests,
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
    let criteria = QuestSearch {
        title: text_param(&params, "title"),
        difficulty: text_param(&params, "difficulty"),
        min_reward: int_param(&params, "minReward"),
        active_only: params.get("activeOnly").is_some_and(|v| v == "true"),
        page: page_params(&params),
    };
    let quests = state.quests().search(&criteria).await?;
    Ok(success_many(quests))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Quest")?;
    let quest = state.quests().find_by_id(id).await?.ok_or(AppError::NotFound("Quest"))?;
    Ok(success_one_ok(quest))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let new: NewQuest = validated(payload, &QUEST_CREATE)?;
    let quest = state.quests().create(&new).await?;
    Ok(success_created(quest, "Quest created successfully"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Quest")?;
    let patch: QuestPatch = validated(payload, &QUEST_UPDATE)?;
    let quest = state
        .quests()
        .update(id, patch)
        .await?
        .ok_or(AppError::NotFound("Quest"))?;
    Ok(success_updated(quest, "Quest updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "Quest")?;
    if !state.quests().delete(id).await? {
        return Err(AppError::NotFound("Quest"));
    }
    Ok(success_message("Quest deleted successfully"))
}
