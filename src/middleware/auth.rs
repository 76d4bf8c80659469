use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::auth::{credentials_match, verify_jwt, BasicCredentials};
use crate::config::{AuthMode, SecurityConfig};
use crate::error::ApiError;

const BASIC_CHALLENGE: &str = "Basic realm=\"item-api\"";
const BEARER_CHALLENGE: &str = "Bearer realm=\"item-api\"";

/// Authenticated caller, inserted into request extensions by [`auth_guard`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub scheme: AuthMode,
}

impl AuthUser {
    fn anonymous() -> Self {
        Self {
            username: "anonymous".to_string(),
            scheme: AuthMode::None,
        }
    }
}

/// Gate in front of `/api/*`: checks the configured scheme, never touches the store
pub async fn auth_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let security = &state.config.security;

    let user = match security.auth_mode {
        AuthMode::None => AuthUser::anonymous(),
        AuthMode::Basic => authenticate_basic(request.headers(), security)
            .map_err(|e| challenge(e, BASIC_CHALLENGE))?,
        AuthMode::Bearer => authenticate_bearer(request.headers(), security)
            .map_err(|e| challenge(e, BEARER_CHALLENGE))?,
    };

    tracing::debug!(user = %user.username, scheme = %user.scheme, "request authenticated");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn authenticate_basic(headers: &HeaderMap, security: &SecurityConfig) -> Result<AuthUser, ApiError> {
    let value = authorization(headers)?;

    let creds = BasicCredentials::from_header_value(value)
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use Basic credentials"))?;

    if !credentials_match(security, &creds.username, &creds.password) {
        tracing::warn!("basic auth rejected for user '{}'", creds.username);
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    Ok(AuthUser {
        username: creds.username,
        scheme: AuthMode::Basic,
    })
}

fn authenticate_bearer(headers: &HeaderMap, security: &SecurityConfig) -> Result<AuthUser, ApiError> {
    let value = authorization(headers)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer token format"))?;

    if token.is_empty() {
        return Err(ApiError::unauthorized("Empty JWT token"));
    }

    let claims = verify_jwt(token, &security.jwt_secret).map_err(|e| {
        tracing::warn!("bearer auth rejected: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    Ok(AuthUser {
        username: claims.sub,
        scheme: AuthMode::Bearer,
    })
}

fn authorization(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))
}

fn challenge(error: ApiError, scheme: &'static str) -> Response {
    let mut response = error.into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(scheme));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use crate::config::AppConfig;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn basic_accepts_configured_user() {
        let config = AppConfig::for_tests(AuthMode::Basic);
        let creds = BasicCredentials {
            username: "user".into(),
            password: "password".into(),
        };
        let user = authenticate_basic(&headers_with(&creds.to_header_value()), &config.security).unwrap();
        assert_eq!(user.username, "user");
        assert_eq!(user.scheme, AuthMode::Basic);
    }

    #[test]
    fn basic_rejects_missing_and_wrong_credentials() {
        let config = AppConfig::for_tests(AuthMode::Basic);
        assert!(authenticate_basic(&HeaderMap::new(), &config.security).is_err());

        let wrong = BasicCredentials {
            username: "user".into(),
            password: "nope".into(),
        };
        let err = authenticate_basic(&headers_with(&wrong.to_header_value()), &config.security).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn bearer_accepts_valid_token_only() {
        let config = AppConfig::for_tests(AuthMode::Bearer);
        let token = generate_jwt(&Claims::new("alice", 1).unwrap(), &config.security.jwt_secret).unwrap();

        let user = authenticate_bearer(&headers_with(&format!("Bearer {}", token)), &config.security).unwrap();
        assert_eq!(user.username, "alice");

        let tampered = format!("Bearer {}x", token);
        assert!(authenticate_bearer(&headers_with(&tampered), &config.security).is_err());
        assert!(authenticate_bearer(&headers_with("Basic dXNlcjpwYXNzd29yZA=="), &config.security).is_err());
    }

    #[test]
    fn challenge_sets_www_authenticate() {
        let response = challenge(ApiError::unauthorized("no"), BASIC_CHALLENGE);
        assert_eq!(response.status(), 401);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], BASIC_CHALLENGE);
    }
}
