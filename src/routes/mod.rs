//! Router assembly.

pub mod common;
pub mod entity;

pub use common::{common_routes, expose_internal_errors, not_found};
pub use entity::{hero_routes, item_routes, quest_routes};

use crate::rate_limit::limit_requests;
use crate::state::AppState;
use axum::{handler::HandlerWithoutStateExt, middleware, Router};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};

/// Full application: rate-limited /heroes and /quests, /items, common routes,
/// static documentation at `/` and a JSON 404 for everything else.
pub fn app(state: AppState) -> Router {
    let settings = state.settings.clone();

    let limited = Router::new()
        .nest("/heroes", hero_routes())
        .nest("/quests", quest_routes())
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            limit_requests,
        ));

    let docs = ServeDir::new(&settings.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .merge(limited)
        .nest("/items", item_routes())
        .merge(common_routes())
        .fallback_service(docs)
        .layer(middleware::from_fn_with_state(
            settings.clone(),
            expose_internal_errors,
        ))
        .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
