use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Longest bearer token lifetime accepted from the environment (one year)
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 366;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_request_logging: bool,
    /// Largest body prefix the HTTP logger keeps per request or response
    pub log_body_limit: usize,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub seed_samples: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub auth_mode: AuthMode,
    pub basic_user: String,
    pub basic_password: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

/// Which authentication scheme guards `/api/*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    None,
    Basic,
    Bearer,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "disabled" => Ok(AuthMode::None),
            "basic" => Ok(AuthMode::Basic),
            "bearer" | "jwt" => Ok(AuthMode::Bearer),
            other => Err(format!("unknown auth mode '{}' (expected none, basic or bearer)", other)),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMode::None => "none",
            AuthMode::Basic => "basic",
            AuthMode::Bearer => "bearer",
        };
        f.write_str(name)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        // API overrides
        if let Some(v) = var("ITEM_API_HOST") {
            self.api.host = v;
        }
        if let Some(v) = var("ITEM_API_PORT").or_else(|| var("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Some(v) = var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Some(v) = var("API_LOG_BODY_LIMIT") {
            self.api.log_body_limit = v.parse().unwrap_or(self.api.log_body_limit);
        }
        if let Some(v) = var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Store overrides
        if let Some(v) = var("STORE_SEED_SAMPLES") {
            self.store.seed_samples = v.parse().unwrap_or(self.store.seed_samples);
        }

        // Security overrides
        if let Some(v) = var("SECURITY_AUTH_MODE") {
            match v.parse() {
                Ok(mode) => self.security.auth_mode = mode,
                Err(e) => tracing::warn!("ignoring SECURITY_AUTH_MODE: {}", e),
            }
        }
        if let Some(v) = var("SECURITY_BASIC_USER") {
            self.security.basic_user = v;
        }
        if let Some(v) = var("SECURITY_BASIC_PASSWORD") {
            self.security.basic_password = v;
        }
        if let Some(v) = var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = var("SECURITY_JWT_EXPIRY_HOURS") {
            match v.parse::<u64>() {
                Ok(hours) if (1..=MAX_JWT_EXPIRY_HOURS).contains(&hours) => self.security.jwt_expiry_hours = hours,
                _ => tracing::warn!(
                    "ignoring SECURITY_JWT_EXPIRY_HOURS={} (expected 1..={})",
                    v,
                    MAX_JWT_EXPIRY_HOURS
                ),
            }
        }
        if let Some(v) = var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
                log_body_limit: 4 * 1024,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            store: StoreConfig { seed_samples: true },
            security: SecurityConfig {
                auth_mode: AuthMode::Basic,
                basic_user: "user".to_string(),
                basic_password: "password".to_string(),
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
                log_body_limit: 2 * 1024,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            store: StoreConfig { seed_samples: true },
            security: SecurityConfig {
                auth_mode: AuthMode::Bearer,
                basic_user: "user".to_string(),
                basic_password: String::new(),
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                enable_request_logging: false,
                log_body_limit: 1024,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            store: StoreConfig { seed_samples: false },
            security: SecurityConfig {
                auth_mode: AuthMode::Bearer,
                basic_user: "user".to_string(),
                basic_password: String::new(),
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    /// Development profile with a chosen auth mode and a fixed JWT secret
    pub fn for_tests(auth_mode: AuthMode) -> Self {
        let mut config = Self::development();
        config.api.port = 0;
        config.security.auth_mode = auth_mode;
        config.security.jwt_secret = "test-secret".to_string();
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
