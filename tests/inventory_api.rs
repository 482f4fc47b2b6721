mod common;

use axum::http::StatusCode;
use common::{ids, TestApp};
use serde_json::{json, Value};

async fn loaded_hero(app: &TestApp) -> i64 {
    // strength 10 -> capacity 50, carrying 40
    let hero = app.hero("Samwise", 10).await;
    let uri = format!("/heroes/{}/inventory", hero);
    for weight in [25, 15] {
        let (status, body) = app
            .post(&uri, json!({ "name": "Pack", "type": "gear", "weight": weight }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }
    hero
}

#[tokio::test]
async fn over_capacity_is_rejected_without_mutation() {
    let app = TestApp::new().await;
    let hero = loaded_hero(&app).await;
    let uri = format!("/heroes/{}/inventory", hero);

    let (status, body) = app
        .post(&uri, json!({ "name": "Anvil", "type": "tool", "weight": 15 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Inventory capacity exceeded");
    assert_eq!(
        body["details"],
        json!({ "capacity": 50, "currentLoad": 40, "itemWeight": 15 })
    );

    let (_, carried) = app.get(&uri).await;
    assert_eq!(carried["count"], 2);
    let (_, all) = app.get("/items").await;
    assert_eq!(all["pagination"]["total"], 2);
}

#[tokio::test]
async fn exactly_full_is_accepted() {
    let app = TestApp::new().await;
    let hero = loaded_hero(&app).await;
    let uri = format!("/heroes/{}/inventory", hero);
    let (status, body) = app
        .post(&uri, json!({ "name": "Rope", "type": "tool", "weight": 10, "rarity": "common" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["hero_id"], hero);
    assert_eq!(body["data"]["damage"], 0);
    assert_eq!(body["data"]["rarity"], "common");
}

#[tokio::test]
async fn existing_item_moves_between_heroes() {
    let app = TestApp::seeded().await;
    // Iron Sword (weight 5) from Aragorn to Legolas
    let (status, body) = app.post("/heroes/3/inventory", json!({ "itemId": 1 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["hero_id"], 3);

    let (_, aragorn) = app.get("/heroes/1/inventory").await;
    assert_eq!(ids(&aragorn), [2]);
    let (_, legolas) = app.get("/heroes/3/inventory").await;
    assert_eq!(ids(&legolas), [1, 4]);
}

#[tokio::test]
async fn re_adding_an_owned_item_is_idempotent() {
    let app = TestApp::new().await;
    let hero = app.hero("Pippin", 2).await;
    let uri = format!("/heroes/{}/inventory", hero);
    let (_, body) = app
        .post(&uri, json!({ "name": "Barrel", "type": "gear", "weight": 10 }))
        .await;
    let item = body["data"]["id"].as_i64().unwrap();
    let (status, body) = app.post(&uri, json!({ "itemId": item })).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["id"], item);
}

#[tokio::test]
async fn missing_weight_and_missing_targets() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post("/heroes/1/inventory", json!({ "name": "Cloak", "type": "armor" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Weight"));

    let (status, body) = app.post("/heroes/99/inventory", json!({ "itemId": 1 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Hero not found");

    let (status, body) = app.post("/heroes/1/inventory", json!({ "itemId": 99 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");

    let (status, body) = app.get("/heroes/99/inventory").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Hero not found");
}

#[tokio::test]
async fn new_inventory_items_are_validated() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post("/heroes/1/inventory", json!({ "name": "", "type": "armor", "weight": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert_eq!(fields, ["name", "weight"]);
}

#[tokio::test]
async fn item_writes_respect_capacity() {
    let app = TestApp::new().await;
    let hero = loaded_hero(&app).await;

    let (status, body) = app
        .post("/items", json!({ "name": "Boulder", "type": "rock", "weight": 11, "hero_id": hero }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["currentLoad"], 40);

    let (status, body) = app
        .post("/items", json!({ "name": "Pebble", "type": "rock", "weight": 1 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let pebble = format!("/items/{}", body["data"]["id"]);

    let (status, _) = app.put(&pebble, json!({ "hero_id": hero, "weight": 11 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = app.put(&pebble, json!({ "hero_id": hero })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hero_id"], hero);

    let (status, _) = app.put(&pebble, json!({ "weight": 11 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = app.put(&pebble, json!({ "hero_id": null, "weight": 11 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hero_id"], Value::Null);

    let (status, body) = app
        .post("/items", json!({ "name": "Ghost", "type": "rock", "weight": 1, "hero_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Hero not found");
}

#[tokio::test]
async fn concurrent_additions_cannot_both_pass() {
    let app = TestApp::new().await;
    let hero = loaded_hero(&app).await;
    let uri = format!("/heroes/{}/inventory", hero);
    let item = json!({ "name": "Crate", "type": "gear", "weight": 10 });
    let (a, b) = tokio::join!(app.post(&uri, item.clone()), app.post(&uri, item));
    let created = [a.0, b.0]
        .iter()
        .filter(|s| **s == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    let (_, carried) = app.get(&uri).await;
    assert_eq!(carried["count"], 3);
}

#[tokio::test]
async fn reweighing_cannot_race_an_assignment() {
    let app = TestApp::new().await;
    let hero = app.hero("Merry", 10).await;
    let inventory = format!("/heroes/{}/inventory", hero);
    for _ in 0..20 {
        let (_, body) = app
            .post("/items", json!({ "name": "Stone", "type": "rock", "weight": 1 }))
            .await;
        let id = body["data"]["id"].as_i64().unwrap();
        let item = format!("/items/{}", id);
        let (assign, reweigh) = tokio::join!(
            app.post(&inventory, json!({ "itemId": id })),
            app.put(&item, json!({ "weight": 100 }))
        );
        let succeeded = [assign.0, reweigh.0].iter().filter(|s| s.is_success()).count();
        assert_eq!(succeeded, 1, "{} / {}", assign.1, reweigh.1);

        let (_, carried) = app.get(&inventory).await;
        let load: i64 = carried["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|i| i["weight"].as_i64())
            .sum();
        assert!(load <= 50, "hero carries {}", load);
        app.delete(&item).await;
    }
}

#[tokio::test]
async fn rename_does_not_undo_an_assignment() {
    let app = TestApp::new().await;
    let hero = app.hero("Rosie", 10).await;
    for _ in 0..10 {
        let (_, body) = app
            .post("/items", json!({ "name": "Ladle", "type": "tool", "weight": 1 }))
            .await;
        let id = body["data"]["id"].as_i64().unwrap();
        let item = format!("/items/{}", id);
        let inventory = format!("/heroes/{}/inventory", hero);
        let (assign, rename) = tokio::join!(
            app.post(&inventory, json!({ "itemId": id })),
            app.put(&item, json!({ "name": "Big Ladle" }))
        );
        assert_eq!(assign.0, StatusCode::CREATED);
        assert_eq!(rename.0, StatusCode::OK);

        let (_, body) = app.get(&item).await;
        assert_eq!(body["data"]["hero_id"], hero);
        assert_eq!(body["data"]["name"], "Big Ladle");
        app.delete(&item).await;
    }
}
