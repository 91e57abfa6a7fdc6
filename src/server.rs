use anyhow::Context;
use axum::{
    http::{HeaderValue, Uri},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::models::{Answer, Category, Post, Quiz};
use crate::database::record::{validate_updatable_keys, Resource};
use crate::database::{schema, DatabaseManager};
use crate::error::ApiError;
use crate::handlers::{protected, public, resource};
use crate::middleware::{password_auth_middleware, token_auth_middleware};
use crate::state::AppState;

/// Build the full router.
///
/// Fails if a resource's updatable-key table is malformed or a CORS origin
/// is not a valid header value.
pub fn app(state: AppState) -> anyhow::Result<Router> {
    let public_routes = Router::new()
        .route("/hello", get(public::hello))
        .route("/plaintext", get(public::plaintext))
        .route("/info", get(public::describe_request))
        .route("/description", get(public::describe_request))
        .route("/health", get(public::health))
        .route("/users", post(public::register_post));

    let login_routes = Router::new()
        .route("/login", post(protected::login_post))
        .route_layer(middleware::from_fn_with_state(state.clone(), password_auth_middleware));

    let token_routes = Router::new()
        .route("/me", get(protected::me_get))
        .route("/logout", get(protected::logout_get))
        .merge(resource_routes::<Post>("/posts")?)
        .merge(resource_routes::<Quiz>("/quizzes")?)
        .route_layer(middleware::from_fn_with_state(state.clone(), token_auth_middleware));

    let open_routes = Router::new()
        .merge(resource_routes::<Category>("/categories")?)
        .merge(resource_routes::<Answer>("/answers")?);

    let mut router = Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(token_routes)
        .merge(open_routes)
        .fallback(route_not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security)?);
    }

    Ok(router.with_state(state))
}

/// Collection and member routes for one resource
fn resource_routes<T: Resource>(path: &str) -> anyhow::Result<Router<AppState>> {
    validate_updatable_keys::<T>()?;

    Ok(Router::new()
        .route(
            path,
            get(resource::index::<T>)
                .post(resource::store::<T>)
                .delete(resource::clear::<T>),
        )
        .route(
            &format!("{}/:id", path),
            get(resource::show::<T>)
                .patch(resource::update::<T>)
                .put(resource::replace::<T>)
                .delete(resource::delete::<T>),
        ))
}

fn cors_layer(security: &SecurityConfig) -> anyhow::Result<CorsLayer> {
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins = security
        .cors_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin '{}'", origin)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

/// Connect, prepare tables if configured, then serve until Ctrl-C or SIGTERM
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    if config.database.auto_prepare {
        schema::prepare(&pool).await.context("failed to prepare tables")?;
    }

    let bind_addr = config.bind_addr();
    tracing::info!("Starting Trivia API in {:?} mode", config.environment);

    let router = app(AppState::new(pool.clone(), config))?;
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Trivia API listening on http://{}", bind_addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    DatabaseManager::close(pool).await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or Ctrl+C
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security(origins: &[&str]) -> SecurityConfig {
        SecurityConfig {
            enable_cors: true,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            token_bytes: 32,
        }
    }

    #[test]
    fn cors_accepts_wildcard_and_explicit_origins() {
        assert!(cors_layer(&security(&["*"])).is_ok());
        assert!(cors_layer(&security(&["https://quiz.example.com", "http://localhost:3000"])).is_ok());
    }

    #[test]
    fn cors_rejects_unencodable_origin() {
        assert!(cors_layer(&security(&["https://bad\norigin"])).is_err());
    }

    #[test]
    fn every_resource_key_table_routes() {
        assert!(resource_routes::<Category>("/categories").is_ok());
        assert!(resource_routes::<Quiz>("/quizzes").is_ok());
        assert!(resource_routes::<Answer>("/answers").is_ok());
        assert!(resource_routes::<Post>("/posts").is_ok());
    }
}
