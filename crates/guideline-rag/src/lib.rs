//! guideline-rag: cited question answering over RBI risk-management guidelines
//!
//! Questions are checked against the corpus's topic catalogue, answered from
//! diversity-ranked guideline chunks by a local language model, and returned
//! with de-duplicated `(document, section)` sources. Each session keeps its
//! own conversation history.

pub mod assistant;
pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod providers;
pub mod retrieval;
pub mod scope;
pub mod server;
pub mod types;

pub use assistant::Assistant;
pub use config::AssistantConfig;
pub use conversation::ConversationTracker;
pub use error::{Error, Result};
pub use scope::{ScopeClassifier, ScopeDecision};
pub use types::{
    document::{Chunk, DocumentType, SourceDocument},
    query::{AskRequest, SearchFilter},
    response::{AnswerStatus, AskResponse, Citation},
};
