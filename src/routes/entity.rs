//! Entity routes. `/search` is registered next to `/:id`; axum prefers the static segment.

use crate::handlers::{heroes, items, quests};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn hero_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(heroes::list).post(heroes::create))
        .route("/search", get(heroes::search))
        .route(
            "/:id",
            get(heroes::read).put(heroes::update).delete(heroes::delete),
        )
        .route(
            "/:id/inventory",
            get(heroes::inventory).post(heroes::add_to_inventory),
        )
}

pub fn quest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(quests::list).post(quests::create))
        .route("/search", get(quests::search))
        .route(
            "/:id",
            get(quests::read).put(quests::update).delete(quests::delete),
        )
}

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list).post(items::create))
        .route("/search", get(items::search))
        .route(
            "/:id",
            get(items::read).put(items::update).delete(items::delete),
        )
}
