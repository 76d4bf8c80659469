mod common;

use std::collections::HashSet;

use anyhow::Result;
use item_api::config::AuthMode;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

async fn data(res: reqwest::Response) -> Result<Value> {
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true, "success flag false or missing: {}", body);
    Ok(body["data"].clone())
}

#[tokio::test]
async fn seeded_crud_scenario() -> Result<()> {
    let server = TestServer::start(AuthMode::None).await?;
    let client = reqwest::Client::new();

    let items = data(client.get(server.url("/api/items")).send().await?).await?;
    let names: Vec<&str> = items
        .as_array()
        .map(|a| a.iter().filter_map(|i| i["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, ["Sample Item 1", "Sample Item 2"]);

    let res = client
        .post(server.url("/api/items"))
        .json(&json!({"name": "New Item", "description": "Desc"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = data(res).await?;
    assert_eq!(created, json!({"id": 3, "name": "New Item", "description": "Desc"}));

    let res = client
        .put(server.url("/api/items/3"))
        .json(&json!({"name": "Updated Item"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = data(res).await?;
    assert_eq!(updated["id"], 3);
    assert_eq!(updated["name"], "Updated Item");
    assert_eq!(updated["description"], Value::Null);

    let res = client.delete(server.url("/api/items/3")).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let res = client.get(server.url("/api/items/3")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(server.url("/api/items/3")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(server.url("/api/items"))
        .json(&json!({"name": "After Delete"}))
        .send()
        .await?;
    assert_eq!(data(res).await?["id"], 4);
    Ok(())
}

#[tokio::test]
async fn bad_requests_are_reported() -> Result<()> {
    let server = TestServer::start(AuthMode::None).await?;
    let client = reqwest::Client::new();

    let res = client.post(server.url("/api/items")).json(&json!({"name": "a"})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["name"].is_string(), "missing field error: {}", body);

    let res = client
        .post(server.url("/api/items"))
        .json(&json!({"name": "x".repeat(51)}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(server.url("/api/items/not-a-number")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(server.url("/api/items/999")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Item 999 not found");

    // Rejected creates do not consume ids
    let res = client.post(server.url("/api/items")).json(&json!({"name": "Valid"})).send().await?;
    assert_eq!(data(res).await?["id"], 3);
    Ok(())
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() -> Result<()> {
    let server = TestServer::start(AuthMode::None).await?;
    let client = reqwest::Client::new();

    let requests = (0..20).map(|n| {
        let client = client.clone();
        let url = server.url("/api/items");
        tokio::spawn(async move {
            let res = client.post(url).json(&json!({"name": format!("Item {}", n)})).send().await?;
            anyhow::Ok(res.json::<Value>().await?["data"]["id"].as_u64())
        })
    });

    let mut ids = HashSet::new();
    for task in requests.collect::<Vec<_>>() {
        let id = task.await??.expect("created item has an id");
        assert!(ids.insert(id), "duplicate id {}", id);
    }
    assert_eq!(ids.len(), 20);
    assert!(ids.iter().all(|id| (3..=22).contains(id)));

    let items = data(client.get(server.url("/api/items")).send().await?).await?;
    assert_eq!(items.as_array().map(Vec::len), Some(22));
    Ok(())
}
