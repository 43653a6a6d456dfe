use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::Json;
use tracing::debug;

use crate::database::Entity;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::ChangeAction;

/// Path and payload identities must both be present and equal
fn check_identity<T: Entity>(entity: &T, id: i64) -> Result<(), ApiError> {
    match entity.id() {
        Some(payload_id) if payload_id == id => Ok(()),
        _ => Err(ApiError::bad_request("Invalid ID")),
    }
}

/// POST /api/{kind}
pub async fn create<T: Entity>(
    State(state): State<AppState>,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let Json(entity) = payload?;
    debug!("REST request to save {} : {:?}", T::NAME, entity);

    if entity.id().is_some() {
        return Err(ApiError::bad_request(format!(
            "A new {} cannot already have an ID",
            T::NAME
        )));
    }

    let saved = T::store(&state.stores).create(entity).await?;
    let id = saved
        .id()
        .ok_or_else(|| ApiError::internal_server_error("Saved record has no identity"))?;

    let alerts = state.record_change::<T>(id, ChangeAction::Created);
    Ok(ApiResponse::created(saved, &format!("/api/{}/{}", T::PATH, id)).with_headers(alerts))
}

/// PUT /api/{kind}/:id
pub async fn update<T: Entity>(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let Path(id) = path?;
    let Json(entity) = payload?;
    debug!("REST request to update {} : {}, {:?}", T::NAME, id, entity);
    check_identity(&entity, id)?;

    let saved = T::store(&state.stores)
        .update(entity)
        .await?
        .ok_or_else(|| ApiError::bad_request("Entity not found"))?;

    let alerts = state.record_change::<T>(id, ChangeAction::Updated);
    Ok(ApiResponse::success(saved).with_headers(alerts))
}

/// PATCH /api/{kind}/:id
///
/// Merge-patch: non-null attributes of the payload overwrite the stored
/// record, everything else is kept.
pub async fn partial_update<T: Entity>(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    debug!("REST request to partial update {} : {}, {:?}", T::NAME, id, patch);
    check_identity(&patch, id)?;

    let store = T::store(&state.stores);
    let mut existing = store
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} {} not found", T::NAME, id)))?;
    existing.merge(patch);

    // Deleted between read and write
    let saved = store
        .update(existing)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} {} not found", T::NAME, id)))?;

    let alerts = state.record_change::<T>(id, ChangeAction::Updated);
    Ok(ApiResponse::success(saved).with_headers(alerts))
}

/// GET /api/{kind}/:id
pub async fn get<T: Entity>(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<T> {
    let Path(id) = path?;
    debug!("REST request to get {} : {}", T::NAME, id);
    T::store(&state.stores)
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("{} {} not found", T::NAME, id)))
}

/// DELETE /api/{kind}/:id
pub async fn delete<T: Entity>(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    debug!("REST request to delete {} : {}", T::NAME, id);
    let removed = T::store(&state.stores).delete_by_id(id).await?;
    if !removed {
        debug!("{} {} did not exist", T::NAME, id);
    }

    let alerts = state.record_change::<T>(id, ChangeAction::Deleted);
    Ok(ApiResponse::no_content().with_headers(alerts))
}
