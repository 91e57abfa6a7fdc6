// POST /users - self-service registration

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::auth::hash_password;
use crate::database::models::User;
use crate::database::record::Fields;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "A user with that email already exists.";

/// Register a user from `{name, email, password}`.
///
/// The duplicate-email check runs before the password is required, so a
/// taken email is reported even when the password is missing.
pub async fn register_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<User> {
    let Json(body) = body?;
    let fields = Fields::new(&body)?;

    let name = fields.required_text("name")?;
    let email = fields.required_text("email")?;

    if User::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(ApiError::bad_request(DUPLICATE_EMAIL));
    }

    let password = fields.required_text("password")?;
    let password_hash = hash_password(&password)?;

    let user = match User::insert(&state.pool, &name, &email, &password_hash).await {
        Ok(user) => user,
        Err(DatabaseError::UniqueViolation(_)) => return Err(ApiError::bad_request(DUPLICATE_EMAIL)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Registered user {} <{}>", user.id, user.email);
    Ok(ApiResponse::created(user))
}
