pub mod auth;
pub mod response;

pub use auth::{password_auth_middleware, token_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
