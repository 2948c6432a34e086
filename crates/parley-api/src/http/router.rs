//! Axum router configuration with middleware.
//!
//! Middleware: security headers, CORS, tracing.
//!
//! When the configured web directory exists it is served as a fallback, so
//! API routes take priority. If it does not exist, only the API is served.

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::{X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let web_dir = state.web_dir.clone();

    let mut router = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/chat_stream", get(handlers::chat::chat_stream))
        .route("/health", get(handlers::health::health))
        .route("/health_upstream", get(handlers::health::health_upstream))
        .route("/health_groq", get(handlers::health::health_upstream))
        .with_state(state);

    if web_dir.is_dir() {
        router = router.fallback_service(ServeDir::new(&web_dir));
        tracing::info!(path = %web_dir.display(), "static file serving enabled");
    }

    router
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::state::tests::test_state;

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        for uri in ["/health", "/no-such-route"] {
            let resp = build_router(test_state(None))
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            let headers = resp.headers();
            assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], "nosniff", "uri {uri}");
            assert_eq!(headers[X_FRAME_OPTIONS], "DENY");
            assert_eq!(headers[X_XSS_PROTECTION], "1; mode=block");
        }
    }

    #[tokio::test]
    async fn test_missing_web_dir_is_not_served() {
        let resp = build_router(test_state(None))
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_web_dir_served_when_present() {
        let dir = std::env::temp_dir().join(format!("parley-web-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>parley</h1>").unwrap();

        let mut state = test_state(None);
        state.web_dir = dir.clone();
        let resp = build_router(state)
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"<h1>parley</h1>");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
