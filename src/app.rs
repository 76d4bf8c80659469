use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::{auth_guard, http_logging_middleware};
use crate::store::ItemStore;

/// Everything a handler can reach: the one store instance and the config it was built from
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ItemStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = if config.store.seed_samples {
            ItemStore::with_seed()
        } else {
            ItemStore::new()
        };

        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

/// Build the full router.
///
/// Layer order, outermost first: CORS, trace span, HTTP logging tee, body limit,
/// then the auth guard on `/api/*` only.
pub fn app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let mut router = Router::new()
        .merge(public_routes())
        .merge(item_routes().route_layer(from_fn_with_state(state.clone(), auth_guard)))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_request_logging {
        router = router.layer(from_fn_with_state(state.clone(), http_logging_middleware));
    }

    router = router.layer(TraceLayer::new_for_http());

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/token", post(public::auth::token))
}

fn item_routes() -> Router<AppState> {
    use protected::items;

    Router::new()
        // Collection
        .route("/api/items", get(items::collection_get).post(items::collection_post))
        // Single item
        .route(
            "/api/items/:id",
            get(items::record_get)
                .put(items::record_put)
                .delete(items::record_delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if security.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}
