//! Response types for assistant queries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Chunk, SourceDocument};

/// Fixed reply for questions outside the corpus's topics
pub const OUT_OF_SCOPE_MESSAGE: &str = "I can only help with questions about Reserve Bank of India \
guidelines on risk management. Please ask about topics such as operational risk, credit risk, \
capital adequacy, liquidity, technology and cyber risk, KYC, fraud or outsourcing.";

/// Generic reply when retrieval or generation fails
pub const FAILURE_MESSAGE: &str =
    "The assistant is temporarily unavailable. Please try again in a few moments.";

/// A (document, section) reference attached to an answer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    /// Source document
    #[serde(rename = "source")]
    pub source_document: SourceDocument,
    /// Section heading within the document
    #[serde(rename = "section")]
    pub section_title: String,
}

impl Citation {
    /// Create a citation
    pub fn new(source_document: SourceDocument, section_title: impl Into<String>) -> Self {
        Self {
            source_document,
            section_title: section_title.into(),
        }
    }

    /// Citation for the chunk's document and section
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self::new(chunk.source_document, chunk.section_title.clone())
    }

    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        if self.section_title.is_empty() {
            format!("[Source: {}]", self.source_document.title())
        } else {
            format!(
                "[Source: {}, Section: {}]",
                self.source_document.title(),
                self.section_title
            )
        }
    }
}

/// How a question was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    /// Answered from retrieved guideline text
    Answered,
    /// Classified as outside the corpus; the language model was not called
    OutOfScope,
    /// The chunk store could not be searched
    RetrievalUnavailable,
    /// The language model failed or timed out
    GenerationUnavailable,
}

/// Result of `Assistant::ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Answer text (or the refusal / failure message)
    pub response: String,
    /// De-duplicated sources in retrieval order
    pub sources: Vec<Citation>,
    /// Topic the question was tagged with
    pub topic: Option<String>,
    /// Whether the question was answered from the corpus
    pub in_scope: bool,
    /// Resolution detail
    pub status: AnswerStatus,
    /// Session the turn was recorded in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl AskResponse {
    /// Successful answer
    pub fn answered(
        response: String,
        sources: Vec<Citation>,
        topic: Option<String>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            response,
            sources,
            topic,
            in_scope: true,
            status: AnswerStatus::Answered,
            session_id: None,
            processing_time_ms,
        }
    }

    /// Polite refusal for out-of-scope questions
    pub fn out_of_scope(topic: Option<String>, processing_time_ms: u64) -> Self {
        Self {
            response: OUT_OF_SCOPE_MESSAGE.to_string(),
            sources: Vec::new(),
            topic,
            in_scope: false,
            status: AnswerStatus::OutOfScope,
            session_id: None,
            processing_time_ms,
        }
    }

    /// Structured failure result; the underlying error is only logged
    pub fn failed(status: AnswerStatus, topic: Option<String>, processing_time_ms: u64) -> Self {
        Self {
            response: FAILURE_MESSAGE.to_string(),
            sources: Vec::new(),
            topic,
            in_scope: false,
            status,
            session_id: None,
            processing_time_ms,
        }
    }

    /// Attach the session id
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Whether the question failed for operational reasons
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            AnswerStatus::RetrievalUnavailable | AnswerStatus::GenerationUnavailable
        )
    }
}
