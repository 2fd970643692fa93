//! API router configuration

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::status))
        // Control surface
        .route("/control", post(handlers::control))
        // Events
        .route("/events", get(handlers::get_events))
        .route("/events/stream", get(handlers::stream_events))
        // Export
        .route("/export/:collection", get(handlers::export_collection));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use noether_engine::{EngineConfig, EvolutionScheduler};
    use noether_knowledge::{InMemoryStore, KnowledgeStore};
    use noether_mutate::MutatorConfig;
    use noether_registry::Registry;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let registry = Arc::new(Registry::standard());
        let store = Arc::new(KnowledgeStore::new(Arc::new(InMemoryStore::new()), 100));
        let scheduler = Arc::new(EvolutionScheduler::new(
            EngineConfig {
                seed: Some(1),
                ..EngineConfig::default()
            },
            MutatorConfig::default(),
            registry,
            store,
            None,
        ));
        create_router(AppState::new(scheduler))
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_reports_idle() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["state"], "Idle");
    }

    #[tokio::test]
    async fn test_control_round_trip() {
        let router = test_router();

        let start = Request::builder()
            .method("POST")
            .uri("/api/v1/control")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"action":"start"}"#))
            .unwrap();
        let response = router.clone().oneshot(start).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stop = Request::builder()
            .method("POST")
            .uri("/api/v1/control")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"action":"stop"}"#))
            .unwrap();
        let response = router.oneshot(stop).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/control")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"action":"explode"}"#))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_unknown_collection_is_rejected() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/export/everything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_proven_is_plain_text() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/export/proven")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/plain"));
    }
}
