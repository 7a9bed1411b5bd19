//! Configuration for the guideline assistant

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Upper bound for `llm.max_retries`; backoff doubles per attempt
pub const MAX_LLM_RETRIES: u32 = 8;

/// Main assistant configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Chunk retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Scope classification configuration
    pub scope: ScopeConfig,
    /// Conversation history configuration
    pub conversation: ConversationConfig,
}

impl AssistantConfig {
    /// Load configuration from a TOML file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.retrieval.mmr_lambda) {
            return Err(Error::Config(format!(
                "retrieval.mmr_lambda must be within 0.0-1.0, got {}",
                self.retrieval.mmr_lambda
            )));
        }
        if self.retrieval.fetch_multiplier < 1.0 {
            return Err(Error::Config(
                "retrieval.fetch_multiplier must be >= 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.scope.min_relevance_score) {
            return Err(Error::Config(format!(
                "scope.min_relevance_score must be within 0.0-1.0, got {}",
                self.scope.min_relevance_score
            )));
        }
        if self.scope.topics.is_empty() {
            return Err(Error::Config("scope.topics must not be empty".to_string()));
        }
        if let Some(topic) = self.scope.topics.iter().find(|t| t.keywords.is_empty()) {
            return Err(Error::Config(format!("topic '{}' has no keywords", topic.name)));
        }
        if self.llm.max_retries > MAX_LLM_RETRIES {
            return Err(Error::Config(format!(
                "llm.max_retries must be at most {}, got {}",
                MAX_LLM_RETRIES, self.llm.max_retries
            )));
        }
        if self.conversation.max_sessions == 0 {
            return Err(Error::Config(
                "conversation.max_sessions must be at least 1".to_string(),
            ));
        }
        if self.conversation.max_entries == Some(0) {
            return Err(Error::Config(
                "conversation.max_entries must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub num_predict: u32,
    /// Per-request timeout in seconds; also bounds the whole generation step
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "tinyllama".to_string(),
            temperature: 0.1,
            num_predict: 500,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the orchestrator
    pub top_k: usize,
    /// MMR balance: 0.0 = pure diversity, 1.0 = pure relevance
    pub mmr_lambda: f32,
    /// Candidates fetched before MMR, as a multiple of `top_k`
    pub fetch_multiplier: f32,
    /// Pre-chunked corpus (JSON array of chunks) for the in-process store
    pub corpus_path: Option<PathBuf>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            mmr_lambda: 0.5,
            fetch_multiplier: 3.0,
            corpus_path: None,
        }
    }
}

/// A topic the corpus covers, with the keywords that signal it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDefinition {
    pub name: String,
    pub keywords: Vec<String>,
}

impl TopicDefinition {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Scope classification thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Minimum number of query words that must match a topic's keywords
    pub min_keyword_overlap: usize,
    /// Relevance score a retrieved chunk needs to count as supporting evidence
    pub min_relevance_score: f32,
    /// Supporting chunks required to answer (values below 1 are treated as 1)
    pub min_relevant_results: usize,
    /// Known topics, in tie-break order
    pub topics: Vec<TopicDefinition>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            min_keyword_overlap: 1,
            min_relevance_score: 0.1,
            min_relevant_results: 1,
            topics: default_topics(),
        }
    }
}

/// Conversation history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Prior turns rendered into the prompt when context is requested
    pub context_turns: usize,
    /// Optional history cap; the oldest turn is evicted beyond it
    pub max_entries: Option<usize>,
    /// Open sessions kept by the server; the least recently used is closed beyond it
    pub max_sessions: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            context_turns: 3,
            max_entries: None,
            max_sessions: 1024,
        }
    }
}

/// Topic catalogue of the RBI risk-management corpus
pub fn default_topics() -> Vec<TopicDefinition> {
    vec![
        TopicDefinition::new(
            "operational risk",
            &[
                "operational", "risk", "resilience", "continuity", "disruption", "incident",
                "loss", "board", "oversight", "governance", "tolerance",
            ],
        ),
        TopicDefinition::new(
            "credit risk",
            &[
                "credit", "risk", "loan", "lending", "borrower", "default", "npa", "provisioning",
                "collateral", "exposure", "concentration", "rating",
            ],
        ),
        TopicDefinition::new(
            "capital adequacy",
            &[
                "capital", "adequacy", "basel", "tier", "crar", "buffer", "leverage", "rwa",
                "weighted", "ratio",
            ],
        ),
        TopicDefinition::new(
            "market risk",
            &[
                "market", "risk", "trading", "interest", "rate", "var", "foreign", "exchange",
                "treasury", "investment",
            ],
        ),
        TopicDefinition::new(
            "liquidity risk",
            &["liquidity", "risk", "lcr", "nsfr", "funding", "deposit", "alm", "cash", "outflow"],
        ),
        TopicDefinition::new(
            "technology risk",
            &[
                "technology", "risk", "information", "system", "cyber", "security", "controls",
                "breach", "malware", "phishing", "authentication", "encryption", "digital",
            ],
        ),
        TopicDefinition::new(
            "kyc and aml",
            &[
                "kyc", "customer", "diligence", "aml", "laundering", "beneficial",
                "identification", "cdd", "pep", "sanctions",
            ],
        ),
        TopicDefinition::new(
            "fraud risk",
            &["fraud", "risk", "wilful", "whistleblower", "warning", "ews", "forensic", "misappropriation"],
        ),
        TopicDefinition::new(
            "outsourcing",
            &["outsourcing", "outsourced", "vendor", "provider", "third", "party", "arrangement"],
        ),
    ]
}
