//! Retrieval: lexical scoring, MMR diversification and the in-process index

pub mod lexical;
pub mod mmr;
pub mod search;

pub use mmr::{mmr_rerank, MmrCandidate};
pub use search::{LexicalIndex, SearchResult};
