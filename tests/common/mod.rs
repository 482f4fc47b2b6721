//! Shared harness: a fresh in-memory database and the full router per test.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use rpg_hero_api::{app, apply_migrations, connect_in_memory, seed::seed, AppState, Settings};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_settings() -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_string(),
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
        ..Settings::default()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(test_settings()).await
    }

    pub async fn with_settings(settings: Settings) -> Self {
        let pool = connect_in_memory().await.expect("in-memory pool");
        apply_migrations(&pool).await.expect("migrations");
        let state = AppState::new(pool, settings);
        TestApp {
            router: app(state.clone()),
            state,
        }
    }

    pub async fn seeded() -> Self {
        let app = Self::new().await;
        seed(&app.state.pool).await.expect("seed");
        app
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, uri, body).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::PUT, uri, body).await
    }

    /// Create a hero and return its id.
    pub async fn hero(&self, name: &str, strength: i64) -> i64 {
        let (status, body) = self
            .post(
                "/heroes",
                serde_json::json!({
                    "name": name,
                    "class": "warrior",
                    "health": 100,
                    "mana": 10,
                    "strength": strength,
                    "intelligence": 10
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().expect("hero id")
    }
}

pub fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["id"].as_i64()).collect())
        .unwrap_or_default()
}

pub fn names(body: &Value, field: &str) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|r| r[field].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
