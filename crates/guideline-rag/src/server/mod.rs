//! HTTP server for the guideline assistant

pub mod routes;
pub mod state;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AssistantConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Assistant HTTP server
pub struct GuidelineServer {
    config: AssistantConfig,
    state: AppState,
}

impl GuidelineServer {
    /// Create a new server with the default providers
    pub async fn new(config: AssistantConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = build_router(self.state);

        tracing::info!("Starting guideline assistant on http://{}", addr);
        tracing::info!("API documentation: http://{}/api/info", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let enable_cors = state.config().server.enable_cors;

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .nest("/api", routes::api_routes())
        .with_state(state)
        // applied bottom to top
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint; ready once the language model responds
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Assistant;
    use crate::providers::{LanguageModel, MemoryChunkStore};
    use crate::types::{Chunk, DocumentType, SourceDocument};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubLlm {
        healthy: bool,
    }

    #[async_trait]
    impl LanguageModel for StubLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("The Board approves the framework [Source: Guidance Note, Section: Board of Directors].".to_string())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(self.healthy)
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn state_with(config: AssistantConfig, healthy: bool) -> AppState {
        let store = MemoryChunkStore::with_chunks(
            &config.retrieval,
            vec![
                Chunk::new(
                    "The Board shall approve the operational risk management framework.",
                    SourceDocument::OperationalRiskGuidance,
                    "Board of Directors",
                    DocumentType::GuidanceNote,
                ),
                Chunk::new(
                    "Banks shall maintain a liquidity coverage ratio of at least 100 percent.",
                    SourceDocument::LiquidityRiskFramework,
                    "Liquidity Coverage Ratio",
                    DocumentType::Framework,
                ),
            ],
        );
        let assistant = Assistant::new(Arc::new(store), Arc::new(StubLlm { healthy }), config);
        AppState::with_assistant(assistant)
    }

    fn router(healthy: bool) -> Router {
        build_router(state_with(AssistantConfig::default(), healthy))
    }

    fn capped_state(max_sessions: usize) -> AppState {
        let mut config = AssistantConfig::default();
        config.conversation.max_sessions = max_sessions;
        state_with(config, true)
    }

    fn ask_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/ask")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_readiness() {
        let app = router(true);
        let response = app.clone().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router(false).oneshot(get_request("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ask_in_scope() {
        let response = router(true)
            .oneshot(ask_request(json!({
                "query": "What are board responsibilities for operational risk?"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["in_scope"], true);
        assert_eq!(body["status"], "answered");
        assert_eq!(body["topic"], "operational risk");
        assert_eq!(
            body["sources"],
            json!([{"source": "operational_risk_guidance", "section": "Board of Directors"}])
        );
        assert!(body["session_id"].is_string());
    }

    #[tokio::test]
    async fn test_ask_out_of_scope_then_summary() {
        let app = router(true);
        let response = app
            .clone()
            .oneshot(ask_request(json!({"query": "How do I bake a cake?"})))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["in_scope"], false);
        assert_eq!(body["sources"], json!([]));
        assert!(body["topic"].is_null());

        let session_id = body["session_id"].as_str().unwrap().to_string();
        let response = app
            .oneshot(get_request(&format!("/api/sessions/{}/summary", session_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let summary = json_body(response).await;
        assert_eq!(summary["total_questions"], 1);
        assert_eq!(summary["out_of_scope_questions"], 1);
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_query() {
        let response = router(true)
            .oneshot(ask_request(json!({"query": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request");
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = router(true);
        let session_id = uuid::Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/sessions/{}/history", session_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        app.clone()
            .oneshot(ask_request(json!({
                "query": "Who approves the operational risk framework?",
                "session_id": session_id,
            })))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/sessions/{}/history", session_id)))
            .await
            .unwrap();
        let history = json_body(response).await;
        assert_eq!(history["entries"].as_array().unwrap().len(), 1);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/sessions/{}", session_id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get_request(&format!("/api/sessions/{}/summary", session_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_suggestions_and_info() {
        let app = router(true);
        let response = app.clone().oneshot(get_request("/api/suggestions")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["questions"].as_array().unwrap().len(), 4);

        let response = app.oneshot(get_request("/api/info")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["name"], "guideline-rag");
    }

    #[tokio::test]
    async fn test_ask_rejects_bad_filter() {
        let app = router(true);
        let query = "What are board responsibilities for operational risk?";

        let response = app
            .clone()
            .oneshot(ask_request(json!({"query": query, "filter": {"author": "rbi"}})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request");

        let response = app
            .oneshot(ask_request(json!({
                "query": query,
                "filter": {"document_type": "press_release"},
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "invalid_request");
    }

    #[tokio::test]
    async fn test_ask_applies_filter() {
        let app = router(true);
        let query = "What are board responsibilities for operational risk?";

        let response = app
            .clone()
            .oneshot(ask_request(json!({
                "query": query,
                "filter": {"document_type": "guidance_note", "topic_tag": null},
            })))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["status"], "answered");

        // only the liquidity framework remains, which says nothing about the board
        let response = app
            .oneshot(ask_request(json!({"query": query, "filter": {"document_type": "framework"}})))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["status"], "out_of_scope");
        assert_eq!(body["sources"], json!([]));
    }

    #[tokio::test]
    async fn test_anonymous_sessions_are_capped() {
        let state = capped_state(5);
        let app = build_router(state.clone());

        for _ in 0..20 {
            let response = app
                .clone()
                .oneshot(ask_request(json!({"query": "How do I bake a cake?"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(state.session_count(), 5);
    }

    #[tokio::test]
    async fn test_least_recently_used_session_is_evicted() {
        let state = capped_state(2);
        let app = build_router(state.clone());
        let (first, second, third) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4(), uuid::Uuid::new_v4());

        for id in [first, second] {
            app.clone()
                .oneshot(ask_request(json!({"query": "How do I bake a cake?", "session_id": id})))
                .await
                .unwrap();
        }

        // reading the first session marks it as recently used
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/sessions/{}/summary", first)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        app.clone()
            .oneshot(ask_request(json!({"query": "How do I bake a cake?", "session_id": third})))
            .await
            .unwrap();

        assert_eq!(state.session_count(), 2);
        assert!(state.session(&first).is_ok());
        assert!(state.session(&third).is_ok());

        let response = app
            .oneshot(get_request(&format!("/api/sessions/{}/summary", second)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
