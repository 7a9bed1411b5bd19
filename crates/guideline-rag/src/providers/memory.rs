//! In-process chunk store backed by the lexical index

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::retrieval::LexicalIndex;
use crate::types::{Chunk, SearchFilter};

use super::chunk_store::{ChunkStore, RetrievedResult};

/// Chunk store wrapping a `LexicalIndex`
pub struct MemoryChunkStore {
    index: Arc<LexicalIndex>,
}

impl MemoryChunkStore {
    /// Create from existing index
    pub fn new(index: Arc<LexicalIndex>) -> Self {
        Self { index }
    }

    /// Create from config, loading `corpus_path` when set
    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        let index = match &config.corpus_path {
            Some(path) => LexicalIndex::load(config, path)?,
            None => {
                tracing::warn!("No corpus configured; every question will be out of scope");
                LexicalIndex::new(config)
            }
        };
        Ok(Self::new(Arc::new(index)))
    }

    /// Create over an in-memory list of chunks
    pub fn with_chunks(config: &RetrievalConfig, chunks: Vec<Chunk>) -> Self {
        Self::new(Arc::new(LexicalIndex::with_chunks(config, chunks)))
    }
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<RetrievedResult>> {
        // scoring is CPU-bound, keep it off the async workers
        let index = self.index.clone();
        let query = query.to_string();
        let filter = filter.clone();

        tokio::task::spawn_blocking(move || {
            index
                .search(&query, k, &filter)
                .into_iter()
                .map(|r| RetrievedResult::new(r.chunk, r.relevance))
                .collect()
        })
        .await
        .map_err(|e| Error::retrieval(format!("Search task failed: {}", e)))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.index.len())
    }

    fn name(&self) -> &str {
        "memory-lexical"
    }
}
