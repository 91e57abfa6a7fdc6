use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Extension,
};

use crate::auth::generate_token;
use crate::database::models::Token;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /login - issue a bearer token for the Basic-authenticated user
pub async fn login_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Token> {
    let value = generate_token(state.config.security.token_bytes);
    let token = Token::insert(&state.pool, user.id, &value).await?;

    tracing::info!("Issued token {} for user {}", token.id, user.id);
    Ok(ApiResponse::success(token))
}

/// GET /me
pub async fn me_get(Extension(user): Extension<AuthUser>) -> String {
    format!("Hello, {}", user.name)
}

/// GET /logout - revoke the presented token
///
/// Never fails once the token middleware has admitted the request.
pub async fn logout_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
) -> Result<String, ApiError> {
    if let Some(token) = presented_token(&headers) {
        if !Token::delete_by_value(&state.pool, token).await? {
            tracing::debug!("Logout for user {} found no token to revoke", user.id);
        }
    }
    Ok(format!("Goodbye, {}", user.name))
}

/// Last space-separated component of the Authorization header
fn presented_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim()
        .split(' ')
        .last()
        .filter(|token| !token.is_empty())
}
