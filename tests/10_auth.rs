mod common;

use anyhow::Result;
use item_api::config::AuthMode;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn health_endpoint_is_public() -> Result<()> {
    let server = TestServer::start(AuthMode::Basic).await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["items"], 2);
    Ok(())
}

#[tokio::test]
async fn basic_mode_challenges_anonymous_callers() -> Result<()> {
    let server = TestServer::start(AuthMode::Basic).await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/items")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Basic realm=\"item-api\"");

    let res = client
        .get(server.url("/api/items"))
        .basic_auth("user", Some("wrong"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/api/items"))
        .basic_auth("user", Some("password"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn bearer_mode_round_trip() -> Result<()> {
    let server = TestServer::start(AuthMode::Bearer).await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/items")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer realm=\"item-api\"");

    let res = client
        .post(server.url("/auth/token"))
        .json(&json!({"username": "user", "password": "password"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["token_type"], "Bearer");
    let token = body["data"]["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty(), "missing token: {}", body);

    let res = client.get(server.url("/api/items")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url("/api/items")).bearer_auth("not-a-jwt").send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn open_mode_needs_no_credentials() -> Result<()> {
    let server = TestServer::start(AuthMode::None).await?;
    let res = reqwest::get(server.url("/api/items")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
