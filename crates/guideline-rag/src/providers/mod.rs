//! Provider abstractions for chunk retrieval and the language model
//!
//! The orchestrator only sees these traits, so the in-process store or the
//! Ollama client can be swapped for remote services.

pub mod chunk_store;
pub mod llm;
pub mod memory;
pub mod ollama;

pub use chunk_store::{ChunkStore, RetrievedResult};
pub use llm::LanguageModel;
pub use memory::MemoryChunkStore;
pub use ollama::OllamaLlm;
