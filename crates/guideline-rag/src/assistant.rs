//! Answer orchestration
//!
//! `Assistant::ask` runs search, scope classification, prompt building,
//! generation and history recording for one question. Provider failures are
//! turned into a structured `AskResponse`; they never escape as errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AssistantConfig;
use crate::conversation::ConversationTracker;
use crate::error::{Error, Result};
use crate::generation::{CitationBuilder, PromptBuilder};
use crate::providers::{ChunkStore, LanguageModel, RetrievedResult};
use crate::scope::ScopeClassifier;
use crate::types::{AnswerStatus, AskRequest, AskResponse, ConversationEntry};

/// Starter questions offered to new sessions
pub const QUICK_QUESTIONS: &[&str] = &[
    "What are operational risk management requirements?",
    "How should banks monitor credit risk?",
    "What are capital adequacy guidelines?",
    "What are technology risk controls?",
];

/// Guideline question-answering pipeline
pub struct Assistant {
    store: Arc<dyn ChunkStore>,
    llm: Arc<dyn LanguageModel>,
    classifier: ScopeClassifier,
    config: AssistantConfig,
}

impl Assistant {
    /// Create an assistant over the given providers
    pub fn new(
        store: Arc<dyn ChunkStore>,
        llm: Arc<dyn LanguageModel>,
        config: AssistantConfig,
    ) -> Self {
        let classifier = ScopeClassifier::new(&config.scope);
        Self {
            store,
            llm,
            classifier,
            config,
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// New session tracker honouring the configured history cap
    pub fn new_session(&self) -> ConversationTracker {
        ConversationTracker::with_capacity_limit(self.config.conversation.max_entries)
    }

    /// Whether the language model is reachable
    pub async fn is_available(&self) -> bool {
        match self.llm.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("{} health check failed: {}", self.llm.name(), e);
                false
            }
        }
    }

    /// Answer one question within a session.
    ///
    /// Answered and out-of-scope turns are recorded in `session`; failed
    /// turns are not.
    pub async fn ask(&self, session: &ConversationTracker, request: &AskRequest) -> AskResponse {
        let start = Instant::now();
        let query = request.query.trim();

        tracing::info!("Question: \"{}\" (session {})", query, session.id());

        let history = if request.include_conversation_context {
            session.recent(self.config.conversation.context_turns)
        } else {
            Vec::new()
        };

        let scope_query = self.scope_query(query, &history);

        let results = match self
            .store
            .search(&scope_query, self.config.retrieval.top_k, &request.filter)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("{} search failed: {}", self.store.name(), e);
                let topic = self.classifier.classify(&scope_query).topic;
                return AskResponse::failed(
                    AnswerStatus::RetrievalUnavailable,
                    topic,
                    elapsed_ms(start),
                )
                .with_session(session.id());
            }
        };

        let decision = self.classifier.classify_with_results(&scope_query, &results);
        if !decision.in_scope {
            tracing::info!(
                "Out of scope ({:?}), {} results retrieved",
                decision.rejection,
                results.len()
            );
            let response = AskResponse::out_of_scope(decision.topic, elapsed_ms(start))
                .with_session(session.id());
            session.record(ConversationEntry::from_response(query, &response));
            return response;
        }

        let relevant: Vec<RetrievedResult> =
            self.classifier.relevant_results(&results).cloned().collect();
        let citations = CitationBuilder::build(&relevant);
        let prompt = PromptBuilder::build_answer_prompt(query, &relevant, &citations, &history);

        tracing::debug!(
            "Prompt built: {} chunks, {} sources, {} history turns",
            relevant.len(),
            citations.len(),
            history.len()
        );

        let answer = match self.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("{} generation failed: {}", self.llm.name(), e);
                return AskResponse::failed(
                    AnswerStatus::GenerationUnavailable,
                    decision.topic,
                    elapsed_ms(start),
                )
                .with_session(session.id());
            }
        };

        let response = AskResponse::answered(answer, citations, decision.topic, elapsed_ms(start))
            .with_session(session.id());
        session.record(ConversationEntry::from_response(query, &response));

        tracing::info!(
            "Answered in {}ms, {} sources, topic {:?}",
            response.processing_time_ms,
            response.sources.len(),
            response.topic
        );

        response
    }

    /// Text used for retrieval and scope checks.
    ///
    /// A follow-up with no topic words of its own borrows the most recent
    /// in-scope question from the supplied history.
    fn scope_query(&self, query: &str, history: &[ConversationEntry]) -> String {
        if self.classifier.classify(query).in_scope {
            return query.to_string();
        }

        match history.iter().rev().find(|entry| entry.in_scope) {
            Some(previous) => {
                tracing::debug!("Follow-up scoped by previous question: \"{}\"", previous.query);
                format!("{} {}", previous.query, query)
            }
            None => query.to_string(),
        }
    }

    /// Call the language model under the configured deadline
    async fn generate(&self, prompt: &str) -> Result<String> {
        let deadline = Duration::from_secs(self.config.llm.timeout_secs);
        match tokio::time::timeout(deadline, self.llm.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(Error::generation(format!(
                "no answer within {}s",
                self.config.llm.timeout_secs
            ))),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
