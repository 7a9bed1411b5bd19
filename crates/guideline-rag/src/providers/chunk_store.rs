//! Chunk store provider trait for ranked passage retrieval

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, SearchFilter};

/// A chunk returned for a query
#[derive(Debug, Clone)]
pub struct RetrievedResult {
    /// The matched chunk
    pub chunk: Chunk,
    /// Relevance score (0.0 to 1.0, higher is more relevant)
    pub relevance_score: f32,
}

impl RetrievedResult {
    pub fn new(chunk: Chunk, relevance_score: f32) -> Self {
        Self {
            chunk,
            relevance_score,
        }
    }
}

/// Trait for ranked, diversity-aware chunk retrieval
///
/// Results come back in rank order. Implementations are responsible for
/// redundancy-penalizing re-ranking (MMR or equivalent); callers only consume
/// the ranked list.
///
/// Implementations:
/// - `MemoryChunkStore`: in-process lexical index with MMR
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Search for the `k` best chunks passing `filter`
    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<RetrievedResult>>;

    /// Get total number of chunks stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;
}
