mod common;

use axum::http::StatusCode;
use common::{ids, names, TestApp};
use serde_json::json;

#[tokio::test]
async fn create_applies_defaults_and_returns_201() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/heroes",
            json!({
                "name": "  Frodo Baggins ",
                "class": "rogue",
                "health": 50,
                "mana": 0,
                "strength": 5,
                "intelligence": 30
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Hero created successfully");
    let hero = &body["data"];
    assert_eq!(hero["name"], "Frodo Baggins");
    assert_eq!(hero["class"], "rogue");
    assert_eq!(hero["level"], 1);
    assert!(hero["id"].as_i64().is_some());
    assert_eq!(hero["created_at"], hero["updated_at"]);
}

#[tokio::test]
async fn name_with_digits_is_a_validation_error() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/heroes",
            json!({
                "name": "Bob3", "class": "warrior", "health": 10,
                "mana": 0, "strength": 1, "intelligence": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "name"));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = TestApp::new().await;
    let req = axum::http::Request::post("/heroes")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn empty_update_only_moves_updated_at() {
    let app = TestApp::new().await;
    let id = app.hero("Boromir", 20).await;
    let (_, before) = app.get(&format!("/heroes/{}", id)).await;
    let (status, after) = app.put(&format!("/heroes/{}", id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["message"], "Hero updated successfully");

    let (before, after) = (&before["data"], &after["data"]);
    for field in ["name", "class", "level", "health", "mana", "strength", "intelligence", "created_at"] {
        assert_eq!(before[field], after[field], "{}", field);
    }
    let (b, a) = (
        before["updated_at"].as_str().unwrap().parse::<chrono::DateTime<chrono::Utc>>().unwrap(),
        after["updated_at"].as_str().unwrap().parse::<chrono::DateTime<chrono::Utc>>().unwrap(),
    );
    assert!(a > b);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = TestApp::new().await;
    let id = app.hero("Faramir", 20).await;
    let (status, body) = app
        .put(&format!("/heroes/{}", id), json!({ "level": "42", "class": "healer" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["level"], 42);
    assert_eq!(body["data"]["class"], "healer");
    assert_eq!(body["data"]["name"], "Faramir");

    let (status, body) = app.put(&format!("/heroes/{}", id), json!({ "level": 101 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["message"], "Level must be between 1 and 100");
}

#[tokio::test]
async fn delete_succeeds_once() {
    let app = TestApp::new().await;
    let id = app.hero("Denethor", 10).await;
    let (status, body) = app.delete(&format!("/heroes/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hero deleted successfully");
    let (status, body) = app.delete(&format!("/heroes/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Hero not found");
}

#[tokio::test]
async fn unknown_and_non_numeric_ids_are_404() {
    let app = TestApp::new().await;
    for uri in ["/heroes/999", "/heroes/abc"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, json!({ "success": false, "error": "Hero not found" }));
    }
    let (status, _) = app.put("/heroes/999", json!({ "level": 2 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pages_are_disjoint_and_contiguous() {
    let app = TestApp::seeded().await;
    let (status, first) = app.get("/heroes?limit=2&offset=0").await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = app.get("/heroes?limit=2&offset=2").await;
    assert_eq!(ids(&first), [1, 2]);
    assert_eq!(ids(&second), [3, 4]);
    assert_eq!(first["pagination"], json!({ "total": 5, "limit": 2, "offset": 0 }));
}

#[tokio::test]
async fn sorting_and_fallbacks() {
    let app = TestApp::seeded().await;
    let (_, body) = app.get("/heroes?sort=level&order=DESC").await;
    assert_eq!(names(&body, "name"), ["Gandalf", "Elrond", "Aragorn", "Legolas", "Gimli"]);

    let (_, body) = app.get("/heroes?sort=name%3B%20DROP%20TABLE%20heroes&order=desc").await;
    assert_eq!(ids(&body), [5, 4, 3, 2, 1]);

    let (_, body) = app.get("/heroes?limit=abc&offset=-3").await;
    assert_eq!(body["pagination"], json!({ "total": 5, "limit": 10, "offset": 0 }));
}

#[tokio::test]
async fn search_by_class_returns_warriors_in_id_order() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/heroes/search?class=warrior").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body, "name"), ["Aragorn", "Gimli"]);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn search_combines_criteria() {
    let app = TestApp::seeded().await;
    let (_, body) = app.get("/heroes/search?minLevel=75&maxLevel=90").await;
    assert_eq!(names(&body, "name"), ["Aragorn", "Legolas", "Elrond"]);

    let (_, body) = app.get("/heroes/search?name=GAN").await;
    assert_eq!(names(&body, "name"), ["Gandalf"]);

    let (_, body) = app.get("/heroes/search?name=%25").await;
    assert_eq!(body["count"], 0);

    let (_, all) = app.get("/heroes/search?limit=3").await;
    let (_, listed) = app.get("/heroes?limit=3").await;
    assert_eq!(ids(&all), ids(&listed));
}

#[tokio::test]
async fn deleting_a_hero_unassigns_items() {
    let app = TestApp::seeded().await;
    let (status, _) = app.delete("/heroes/1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, sword) = app.get("/items/1").await;
    assert_eq!(sword["data"]["hero_id"], serde_json::Value::Null);
}
