use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::extractors::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::store::{Item, ItemCandidate};

/// GET /api/items - List all items
pub async fn get(State(state): State<AppState>) -> ApiResult<Vec<Item>> {
    Ok(ApiResponse::success(state.store.list()))
}

/// POST /api/items - Create an item; the store assigns the id
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(candidate): ValidatedJson<ItemCandidate>,
) -> ApiResult<Item> {
    let item = state.store.create(candidate)?;
    tracing::info!(id = item.id, user = %user.username, "created item '{}'", item.name);
    Ok(ApiResponse::created(item))
}
