//! Answer generation: prompts, citations and the Ollama client

pub mod citation;
pub mod ollama;
pub mod prompt;

pub use citation::CitationBuilder;
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
