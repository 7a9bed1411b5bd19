//! In-process lexical index over guideline chunks

use parking_lot::RwLock;
use std::path::Path;

use super::lexical::{cosine_similarity, term_vector, TermVector};
use super::mmr::{mmr_rerank, MmrCandidate};
use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, SearchFilter};

/// Search result with chunk and relevance
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Relevance score (0.0-1.0, higher is better)
    pub relevance: f32,
}

struct IndexedChunk {
    chunk: Chunk,
    vector: TermVector,
}

/// Lexical index scoring chunks by term-vector cosine similarity and
/// diversifying the top results with MMR
pub struct LexicalIndex {
    entries: RwLock<Vec<IndexedChunk>>,
    mmr_lambda: f32,
    fetch_multiplier: f32,
}

impl LexicalIndex {
    /// Create an empty index
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            mmr_lambda: config.mmr_lambda,
            fetch_multiplier: config.fetch_multiplier,
        }
    }

    /// Create an index over the given chunks
    pub fn with_chunks(config: &RetrievalConfig, chunks: Vec<Chunk>) -> Self {
        let index = Self::new(config);
        index.insert_chunks(chunks);
        index
    }

    /// Load a pre-chunked corpus (JSON array of chunks)
    pub fn load(config: &RetrievalConfig, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let chunks: Vec<Chunk> = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("Invalid corpus file {}: {}", path.display(), e))
        })?;
        tracing::info!("Loaded {} chunks from {}", chunks.len(), path.display());
        Ok(Self::with_chunks(config, chunks))
    }

    /// Index additional chunks
    pub fn insert_chunks(&self, chunks: Vec<Chunk>) {
        let indexed: Vec<IndexedChunk> = chunks
            .into_iter()
            .map(|chunk| {
                // section titles carry strong topical signal
                let vector = term_vector(&format!("{} {}", chunk.section_title, chunk.text));
                IndexedChunk { chunk, vector }
            })
            .collect();
        self.entries.write().extend(indexed);
    }

    /// Search for the `top_k` most relevant, mutually distinct chunks
    pub fn search(&self, query: &str, top_k: usize, filter: &SearchFilter) -> Vec<SearchResult> {
        if top_k == 0 {
            return Vec::new();
        }

        let query_vector = term_vector(query);
        if query_vector.is_empty() {
            return Vec::new();
        }

        let entries = self.entries.read();

        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| filter.matches(&entry.chunk))
            .map(|(idx, entry)| (idx, cosine_similarity(&query_vector, &entry.vector)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let fetch = ((top_k as f32) * self.fetch_multiplier).ceil() as usize;
        scored.truncate(fetch.max(top_k));

        tracing::debug!(
            "Lexical search: {} candidates for MMR (top_k = {})",
            scored.len(),
            top_k
        );

        let candidates: Vec<MmrCandidate> = scored
            .into_iter()
            .map(|(idx, score)| MmrCandidate {
                id: idx,
                score,
                vector: entries[idx].vector.clone(),
            })
            .collect();

        mmr_rerank(candidates, top_k, self.mmr_lambda)
            .into_iter()
            .map(|(idx, relevance)| SearchResult {
                chunk: entries[idx].chunk.clone(),
                relevance,
            })
            .collect()
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
