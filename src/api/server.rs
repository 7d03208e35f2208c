//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::handlers;
use super::models::{ApiError, SearchParams};
use crate::config::ServerConfig;
use crate::search::QueryService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
}

/// CORS for the configured frontend origins; `*` allows any origin.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Build the application router
pub fn build_router(service: Arc<QueryService>, config: &ServerConfig) -> Router {
    let app_state = AppState { service };

    Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))

        .route("/api/search", get(search_handler))
        .route("/api/shuffle", get(shuffle_handler).post(shuffle_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/reload", post(reload_handler))

        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config))
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(service: Arc<QueryService>, config: &ServerConfig) -> Result<()> {
    let app = build_router(service, config);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🌐 API server listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(handlers::health_check(&state.service).await)
}

/// Search handler
async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    Json(handlers::search(&state.service, &params).await)
}

/// Shuffle handler
async fn shuffle_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(handlers::shuffle(&state.service).await)
}

/// Catalog statistics handler
async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(handlers::stats(&state.service).await)
}

/// Reload handler
async fn reload_handler(State(state): State<AppState>) -> impl IntoResponse {
    match handlers::reload(&state.service).await {
        Ok(count) => (StatusCode::OK, Json(serde_json::json!({ "catalogSize": count }))).into_response(),
        Err(e) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (status, Json(ApiError::new(e.to_string()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogStore, Category, VideoRecord};
    use crate::config::SearchConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        let mut python = VideoRecord::new("a", "Python Lists in 60s", 45);
        python.category = Category::Python;
        let mut css = VideoRecord::new("b", "CSS Grid Basics", 50);
        css.category = Category::HtmlCss;

        let store = Arc::new(CatalogStore::new(vec![python, css]));
        let service = Arc::new(QueryService::new(store, SearchConfig::default()));
        build_router(service, &ServerConfig::default())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let (status, body) = get_json(router(), "/api/search?query=python").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["results"][0]["videoId"], "a");
        assert!(body["elapsedMs"].is_number());
    }

    #[tokio::test]
    async fn test_search_without_query_returns_everything() {
        let (_, body) = get_json(router(), "/api/search").await;
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_ignores_non_numeric_limit() {
        let (status, body) = get_json(router(), "/api/search?query=&limit=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sampling_mode_endpoint() {
        let (_, body) = get_json(router(), "/api/search?query=go&limit=4&mode=sampling").await;
        assert_eq!(body["results"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_shuffle_endpoint_accepts_post() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/shuffle")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["catalogSize"], 2);
        assert!(body["elapsedMs"].is_number());
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let (status, health) = get_json(router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["catalogSize"], 2);

        let (_, stats) = get_json(router(), "/api/stats").await;
        assert_eq!(stats["totalVideos"], 2);
        assert_eq!(stats["categories"]["HTML/CSS"], 1);
    }

    #[tokio::test]
    async fn test_cors_allows_dev_frontend() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/search?query=css")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_reload_without_source_keeps_catalog() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
