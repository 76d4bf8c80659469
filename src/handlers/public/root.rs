use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - Service description
pub async fn root(State(state): State<AppState>) -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Ok(ApiResponse::success(json!({
        "name": "Item API",
        "version": version,
        "environment": state.config.environment,
        "auth": state.config.security.auth_mode,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "token": "/auth/token (public, bearer mode only)",
            "items": "/api/items[/:id] (protected)",
        }
    })))
}
