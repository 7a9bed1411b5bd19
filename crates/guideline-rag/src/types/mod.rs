//! Core types for the guideline assistant

pub mod conversation;
pub mod document;
pub mod query;
pub mod response;

pub use conversation::{ConversationEntry, ConversationSummary};
pub use document::{Chunk, DocumentType, SourceDocument};
pub use query::{AskRequest, SearchFilter};
pub use response::{AnswerStatus, AskResponse, Citation};
