use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::BasicCredentials;

/// How the CLI authenticates to the server
#[derive(Debug, Clone)]
pub enum ClientAuth {
    None,
    Basic(BasicCredentials),
    Bearer(String),
}

/// Thin HTTP client for a running item-api server
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    auth: ClientAuth,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(server: &str, auth: ClientAuth) -> anyhow::Result<Self> {
        let base = Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(anyhow!("server URL must be http or https, got '{}'", base.scheme()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { base, auth, http })
    }

    pub fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("cannot build URL for '{}'", path))
    }

    /// GET and unwrap the `data` field of the success envelope
    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    fn request(&self, method: Method, path: &str) -> anyhow::Result<RequestBuilder> {
        let builder = self.http.request(method, self.url(path)?);
        Ok(match &self.auth {
            ClientAuth::None => builder,
            ClientAuth::Basic(creds) => builder.basic_auth(&creds.username, Some(&creds.password)),
            ClientAuth::Bearer(token) => builder.bearer_auth(token),
        })
    }

    async fn send(&self, builder: RequestBuilder) -> anyhow::Result<Value> {
        let response = builder.send().await.context("request failed")?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("server returned {} with a non-JSON body", status))?;

        if !status.is_success() {
            return Err(anyhow!("{} ({})", error_message(&body), status));
        }

        Ok(body.get("data").cloned().unwrap_or(body))
    }
}

/// Best human-readable message from an error body
pub fn error_message(body: &Value) -> String {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();

    match body.get("field_errors").and_then(Value::as_object) {
        Some(fields) if !fields.is_empty() => {
            let details: Vec<String> = fields
                .iter()
                .map(|(field, msg)| format!("{}: {}", field, msg.as_str().unwrap_or_default()))
                .collect();
            format!("{} [{}]", message, details.join(", "))
        }
        _ => message,
    }
}
