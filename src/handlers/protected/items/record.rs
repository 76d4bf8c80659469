use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};

use crate::app::AppState;
use crate::extractors::ValidatedJson;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::store::{Item, ItemCandidate};

/// GET /api/items/:id - Get a single item by id
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Item> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.store.get(id)?))
}

/// PUT /api/items/:id - Replace name and description; the path id wins over any id in the body
pub async fn put(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    ValidatedJson(candidate): ValidatedJson<ItemCandidate>,
) -> ApiResult<Item> {
    let Path(id) = id?;
    let item = state.store.update(id, candidate)?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/items/:id - Remove an item; its id is never handed out again
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.store.delete(id)?;
    tracing::info!(id, user = %user.username, "deleted item");
    Ok(ApiResponse::no_content())
}
