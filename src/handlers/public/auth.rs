use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::auth::{credentials_match, generate_jwt, Claims};
use crate::config::AuthMode;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: i64,
}

/// POST /auth/token - Exchange the configured username/password for a bearer token
pub async fn token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> ApiResult<TokenResponse> {
    let security = &state.config.security;

    if security.auth_mode != AuthMode::Bearer {
        return Err(ApiError::not_found("Token issuance is only available in bearer auth mode"));
    }

    if !credentials_match(security, &request.username, &request.password) {
        tracing::warn!("token request rejected for user '{}'", request.username);
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let claims = Claims::new(request.username, security.jwt_expiry_hours)?;
    let expires_at = claims.exp;
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    tracing::info!("issued token for '{}'", claims.sub);

    Ok(ApiResponse::success(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_at,
    }))
}
