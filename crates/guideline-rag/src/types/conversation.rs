//! Conversation history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::response::{AskResponse, Citation};

/// One recorded question/answer turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub query: String,
    pub response: String,
    /// Non-empty whenever `in_scope` is true
    pub sources: Vec<Citation>,
    pub topic: Option<String>,
    pub in_scope: bool,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    /// Build an entry from a question and the assistant's answer
    pub fn from_response(query: impl Into<String>, response: &AskResponse) -> Self {
        Self {
            query: query.into(),
            response: response.response.clone(),
            sources: response.sources.clone(),
            topic: response.topic.clone(),
            in_scope: response.in_scope,
            timestamp: Utc::now(),
        }
    }
}

/// Aggregate statistics over a session's history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Number of recorded turns
    pub total_questions: usize,
    /// Distinct (document, section) pairs cited across all turns
    pub unique_sources: usize,
    /// Topics the session touched
    pub topics_seen: BTreeSet<String>,
    /// Turns refused as out of scope
    pub out_of_scope_questions: usize,
}
