//! Generic CRUD controller, instantiated once per `Resource`.
//!
//! | verb   | path              | handler   |
//! |--------|-------------------|-----------|
//! | GET    | /{table}          | `index`   |
//! | POST   | /{table}          | `store`   |
//! | DELETE | /{table}          | `clear`   |
//! | GET    | /{table}/:id      | `show`    |
//! | PATCH  | /{table}/:id      | `update`  |
//! | PUT    | /{table}/:id      | `replace` |
//! | DELETE | /{table}/:id      | `delete`  |

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::database::record::{apply_patch, Resource};
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

type IdParam = Result<Path<i64>, PathRejection>;
type JsonBody = Result<Json<Value>, JsonRejection>;

fn record_id(id: IdParam) -> Result<i64, ApiError> {
    let Path(id) = id.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    Ok(id)
}

/// GET /{table} - every row, ordered by id
pub async fn index<T: Resource>(State(state): State<AppState>) -> ApiResult<Vec<Value>> {
    let records = Repository::<T>::new(&state.pool).select_all().await?;

    let mut data = Vec::with_capacity(records.len());
    for record in &records {
        data.push(record.to_json(&state.pool).await?);
    }
    Ok(ApiResponse::success(data))
}

/// POST /{table} - decode, validate references and insert
pub async fn store<T: Resource>(State(state): State<AppState>, body: JsonBody) -> ApiResult<Value> {
    let Json(body) = body?;
    let record = T::from_json(&body)?;
    record.validate(&state.pool, None).await?;

    let created = Repository::<T>::new(&state.pool).insert(&record).await?;
    tracing::debug!("Created {} {}", T::NAME, created.id());

    Ok(ApiResponse::created(created.to_json(&state.pool).await?))
}

/// GET /{table}/:id
pub async fn show<T: Resource>(State(state): State<AppState>, id: IdParam) -> ApiResult<Value> {
    let id = record_id(id)?;
    let record = Repository::<T>::new(&state.pool).select_404(id).await?;
    Ok(ApiResponse::success(record.to_json(&state.pool).await?))
}

/// PATCH /{table}/:id - apply only the updatable keys present in the body
pub async fn update<T: Resource>(
    State(state): State<AppState>,
    id: IdParam,
    body: JsonBody,
) -> ApiResult<Value> {
    let id = record_id(id)?;
    let Json(body) = body?;
    let repository = Repository::<T>::new(&state.pool);

    let previous = repository.select_404(id).await?;
    let mut record = previous.clone();
    let applied = apply_patch(&mut record, &body)?;
    record.validate(&state.pool, Some(&previous)).await?;

    let saved = repository.save(&record).await?;
    tracing::debug!("Patched {} {}: {:?}", T::NAME, id, applied);

    Ok(ApiResponse::success(saved.to_json(&state.pool).await?))
}

/// PUT /{table}/:id - decode a full record and overwrite the stored one
pub async fn replace<T: Resource>(
    State(state): State<AppState>,
    id: IdParam,
    body: JsonBody,
) -> ApiResult<Value> {
    let id = record_id(id)?;
    let Json(body) = body?;
    let replacement = T::from_json(&body)?;
    let repository = Repository::<T>::new(&state.pool);

    let previous = repository.select_404(id).await?;
    let mut record = previous.clone();
    record.replace_with(replacement);
    record.validate(&state.pool, Some(&previous)).await?;

    let saved = repository.save(&record).await?;
    tracing::debug!("Replaced {} {}", T::NAME, id);

    Ok(ApiResponse::success(saved.to_json(&state.pool).await?))
}

/// DELETE /{table}/:id
pub async fn delete<T: Resource>(State(state): State<AppState>, id: IdParam) -> Result<StatusCode, ApiError> {
    let id = record_id(id)?;
    Repository::<T>::new(&state.pool).delete(id).await?;
    tracing::debug!("Deleted {} {}", T::NAME, id);
    Ok(StatusCode::OK)
}

/// DELETE /{table} - remove every row; development and testing only
pub async fn clear<T: Resource>(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let removed = Repository::<T>::new(&state.pool).clear().await?;
    tracing::info!("Cleared {} rows from {}", removed, T::TABLE);
    Ok(StatusCode::OK)
}
