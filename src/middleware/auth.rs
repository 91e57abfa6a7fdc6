use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use headers::{authorization::Basic, Authorization, HeaderMapExt};

use crate::auth::verify_password;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// User resolved by one of the auth middlewares, injected into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Bearer token middleware: resolves the token through the tokens table
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(ApiError::unauthorized)?;

    let user = User::find_by_token(&state.pool, &token)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Rejected unknown bearer token");
            ApiError::unauthorized("Invalid or revoked token")
        })?;

    request.extensions_mut().insert(AuthUser::from(user));
    Ok(next.run(request).await)
}

/// Basic credentials middleware (email:password); only guards login
pub async fn password_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = request
        .headers()
        .typed_get::<Authorization<Basic>>()
        .ok_or_else(|| ApiError::unauthorized("Missing or invalid Basic Authorization header"))?;

    let email = credentials.username();
    let user = User::find_by_email(&state.pool, email).await?;

    let user = match user {
        Some(user) if verify_password(credentials.password(), &user.password) => user,
        _ => {
            tracing::warn!("Failed password login for {}", email);
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
    };

    request.extensions_mut().insert(AuthUser::from(user));
    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        let token = token.trim();
        if token.is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc123")).unwrap(), "abc123");
    }

    #[test]
    fn rejects_missing_empty_and_foreign_schemes() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
        assert!(extract_bearer_token(&headers("Bearer   ")).is_err());
        assert!(extract_bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
    }

    #[test]
    fn basic_credentials_decode_through_typed_header() {
        // ada@example.com:secret
        let map = headers("Basic YWRhQGV4YW1wbGUuY29tOnNlY3JldA==");
        let basic = map.typed_get::<Authorization<Basic>>().unwrap();
        assert_eq!(basic.username(), "ada@example.com");
        assert_eq!(basic.password(), "secret");
    }
}
