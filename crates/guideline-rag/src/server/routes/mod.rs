//! API routes for the assistant server

pub mod ask;
pub mod sessions;

use axum::{
    routing::{delete, get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Questions
        .route("/ask", post(ask::ask))
        .route("/suggestions", get(ask::suggestions))
        // Conversation sessions
        .route("/sessions/:id/summary", get(sessions::get_summary))
        .route("/sessions/:id/history", get(sessions::get_history))
        .route("/sessions/:id", delete(sessions::delete_session))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "guideline-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Question answering over RBI risk-management guidelines with cited sources",
        "endpoints": {
            "POST /api/ask": "Answer a question (optionally with conversation context)",
            "GET /api/suggestions": "Quick questions for a new conversation",
            "GET /api/sessions/:id/summary": "Session statistics",
            "GET /api/sessions/:id/history": "Session transcript",
            "DELETE /api/sessions/:id": "Clear a session"
        },
        "features": {
            "scope_guard": "Questions outside the guideline topics are politely refused",
            "citations": "Every answer lists its (document, section) sources",
            "diversity": "Retrieval is re-ranked with maximal marginal relevance"
        }
    }))
}
