//! Question endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::assistant::QUICK_QUESTIONS;
use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse, SearchFilter};

/// JSON body of `POST /api/ask`
#[derive(Debug, Deserialize)]
pub struct AskPayload {
    pub query: String,
    #[serde(default)]
    pub include_conversation_context: bool,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// Untyped `key -> value|null` metadata filter
    #[serde(default)]
    pub filter: HashMap<String, Option<String>>,
}

impl AskPayload {
    /// Validate and convert into an assistant request
    pub fn into_request(self) -> Result<AskRequest> {
        if self.query.trim().is_empty() {
            return Err(Error::invalid("query must not be empty"));
        }

        let mut request = AskRequest::new(self.query).with_filter(SearchFilter::from_map(&self.filter)?);
        if self.include_conversation_context {
            request = request.with_context();
        }
        if let Some(id) = self.session_id {
            request = request.with_session(id);
        }
        Ok(request)
    }
}

/// POST /api/ask - Answer a guideline question
///
/// Provider outages come back as a 200 with a failure `status`; only malformed
/// requests are HTTP errors.
pub async fn ask(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AskPayload>, JsonRejection>,
) -> Result<Json<AskResponse>> {
    let Json(payload) = payload.map_err(|e| Error::invalid(e.body_text()))?;
    let request = payload.into_request()?;

    let session = state.session_or_create(request.session_id);
    let response = state.assistant().ask(&session, &request).await;

    Ok(Json(response))
}

/// Starter questions
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub questions: Vec<&'static str>,
}

/// GET /api/suggestions - Quick questions for a new conversation
pub async fn suggestions() -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        questions: QUICK_QUESTIONS.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentType;

    fn payload(body: serde_json::Value) -> AskPayload {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_payload_into_request() {
        let session_id = Uuid::new_v4();
        let request = payload(serde_json::json!({
            "query": "What is the LCR requirement?",
            "include_conversation_context": true,
            "session_id": session_id,
            "filter": {"document_type": "framework", "topic_tag": null},
        }))
        .into_request()
        .unwrap();

        assert!(request.include_conversation_context);
        assert_eq!(request.session_id, Some(session_id));
        assert_eq!(request.filter, SearchFilter::by_document_type(DocumentType::Framework));
    }

    #[test]
    fn test_payload_rejects_bad_filter() {
        let unknown_key = payload(serde_json::json!({"query": "q", "filter": {"author": "rbi"}}));
        assert!(matches!(unknown_key.into_request(), Err(Error::InvalidRequest(_))));

        let bad_value = payload(serde_json::json!({
            "query": "q",
            "filter": {"document_type": "press_release"},
        }));
        assert!(matches!(bad_value.into_request(), Err(Error::InvalidRequest(_))));
    }
}
