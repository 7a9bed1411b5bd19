//! Conversation session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{ConversationEntry, ConversationSummary};

/// Session statistics
#[derive(Debug, Serialize)]
pub struct SessionSummaryResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: ConversationSummary,
}

/// Session transcript
#[derive(Debug, Serialize)]
pub struct SessionHistoryResponse {
    pub session_id: Uuid,
    pub entries: Vec<ConversationEntry>,
}

/// GET /api/sessions/:id/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummaryResponse>> {
    let session = state.session(&id)?;

    Ok(Json(SessionSummaryResponse {
        session_id: id,
        created_at: session.created_at(),
        summary: session.summary(),
    }))
}

/// GET /api/sessions/:id/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionHistoryResponse>> {
    let session = state.session(&id)?;

    Ok(Json(SessionHistoryResponse {
        session_id: id,
        entries: session.history(),
    }))
}

/// DELETE /api/sessions/:id - Clear the chat
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.remove_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
