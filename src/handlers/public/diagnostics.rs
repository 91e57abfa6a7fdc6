use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, Version},
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET /hello
pub async fn hello() -> Json<Value> {
    Json(json!({ "hello": "world" }))
}

/// GET /plaintext
pub async fn plaintext() -> &'static str {
    "Hello, world!"
}

/// GET /info and GET /description: echo the request line and headers
pub async fn describe_request(method: Method, uri: Uri, version: Version, headers: HeaderMap) -> String {
    render_request(&method, &uri, version, &headers)
}

fn render_request(method: &Method, uri: &Uri, version: Version, headers: &HeaderMap) -> String {
    let mut text = format!("{} {} {:?}\n", method, uri, version);
    for (name, value) in headers {
        text.push_str(name.as_str());
        text.push_str(": ");
        text.push_str(&String::from_utf8_lossy(value.as_bytes()));
        text.push('\n');
    }
    text
}

/// GET /health - liveness plus a `SELECT 1` round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn renders_request_line_then_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("localhost:8080"));
        headers.insert("x-quiz", HeaderValue::from_static("42"));

        let uri: Uri = "/info?verbose=1".parse().unwrap();
        let text = render_request(&Method::GET, &uri, Version::HTTP_11, &headers);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "GET /info?verbose=1 HTTP/1.1");
        assert!(lines.contains(&"host: localhost:8080"));
        assert!(lines.contains(&"x-quiz: 42"));
    }
}
