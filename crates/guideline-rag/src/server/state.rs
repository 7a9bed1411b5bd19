//! Application state for the assistant server

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::assistant::Assistant;
use crate::config::AssistantConfig;
use crate::conversation::ConversationTracker;
use crate::error::{Error, Result};
use crate::providers::{ChunkStore, LanguageModel, MemoryChunkStore, OllamaLlm};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Question-answering pipeline
    assistant: Assistant,
    /// Conversation trackers keyed by session id
    sessions: DashMap<Uuid, SessionSlot>,
    /// Logical clock ordering session use
    clock: AtomicU64,
}

struct SessionSlot {
    tracker: Arc<ConversationTracker>,
    last_used: AtomicU64,
}

impl AppState {
    /// Create state with the in-process chunk store and the Ollama model
    pub async fn new(config: AssistantConfig) -> Result<Self> {
        let store: Arc<dyn ChunkStore> = Arc::new(MemoryChunkStore::from_config(&config.retrieval)?);
        let chunks = store.len().await?;
        tracing::info!("Chunk store: {} ({} chunks)", store.name(), chunks);

        let llm: Arc<dyn LanguageModel> = Arc::new(OllamaLlm::new(&config.llm)?);
        tracing::info!("Language model: {} ({})", llm.name(), llm.model());

        Ok(Self::with_assistant(Assistant::new(store, llm, config)))
    }

    /// Create state around an existing assistant
    pub fn with_assistant(assistant: Assistant) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                assistant,
                sessions: DashMap::new(),
                clock: AtomicU64::new(0),
            }),
        }
    }

    pub fn assistant(&self) -> &Assistant {
        &self.inner.assistant
    }

    pub fn config(&self) -> &AssistantConfig {
        self.inner.assistant.config()
    }

    /// Look up a session, opening it when unknown or absent.
    ///
    /// Opening a session beyond `conversation.max_sessions` closes the least
    /// recently used one.
    pub fn session_or_create(&self, id: Option<Uuid>) -> Arc<ConversationTracker> {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let tick = self.tick();

        if let Some(slot) = self.inner.sessions.get(&id) {
            slot.last_used.store(tick, Ordering::Relaxed);
            return slot.tracker.clone();
        }

        let conversation = &self.config().conversation;
        self.evict_least_recent(conversation.max_sessions.saturating_sub(1));

        let max_entries = conversation.max_entries;
        let tracker = self
            .inner
            .sessions
            .entry(id)
            .or_insert_with(|| SessionSlot {
                tracker: Arc::new(ConversationTracker::with_id(id, max_entries)),
                last_used: AtomicU64::new(tick),
            })
            .tracker
            .clone();

        tracing::info!("Opened session {} ({} open)", id, self.session_count());
        tracker
    }

    /// Get an existing session
    pub fn session(&self, id: &Uuid) -> Result<Arc<ConversationTracker>> {
        let tick = self.tick();
        self.inner
            .sessions
            .get(id)
            .map(|slot| {
                slot.last_used.store(tick, Ordering::Relaxed);
                slot.tracker.clone()
            })
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    /// Clear and forget a session
    pub fn remove_session(&self, id: &Uuid) -> Result<()> {
        let (_, slot) = self
            .inner
            .sessions
            .remove(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        slot.tracker.clear();
        tracing::info!("Closed session {}", id);
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }

    fn tick(&self) -> u64 {
        self.inner.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Close least recently used sessions until at most `keep` remain
    fn evict_least_recent(&self, keep: usize) {
        while self.inner.sessions.len() > keep {
            let oldest = self
                .inner
                .sessions
                .iter()
                .min_by_key(|slot| slot.last_used.load(Ordering::Relaxed))
                .map(|slot| *slot.key());

            let Some(id) = oldest else { break };
            if let Some((_, slot)) = self.inner.sessions.remove(&id) {
                slot.tracker.clear();
                tracing::debug!("Evicted idle session {}", id);
            }
        }
    }

    /// Ready when the language model passes its health check
    pub async fn is_ready(&self) -> bool {
        self.inner.assistant.is_available().await
    }
}
