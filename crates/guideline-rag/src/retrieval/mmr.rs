//! Maximal Marginal Relevance re-ranking
//!
//! MMR = λ × relevance(query, chunk) - (1-λ) × max(similarity(chunk, selected))
//!
//! λ = 1.0 keeps plain relevance order, λ = 0.0 maximizes diversity.

use super::lexical::{cosine_similarity, TermVector};

/// Candidate for MMR re-ranking
#[derive(Debug, Clone)]
pub struct MmrCandidate {
    /// Caller's index for the candidate
    pub id: usize,
    /// Relevance to the query
    pub score: f32,
    /// Term vector used for pairwise redundancy
    pub vector: TermVector,
}

/// Select `k` candidates balancing relevance and redundancy.
///
/// Returns `(id, relevance)` pairs in selection order. The relevance score is
/// the candidate's original score, not its MMR value.
pub fn mmr_rerank(candidates: Vec<MmrCandidate>, k: usize, lambda: f32) -> Vec<(usize, f32)> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }

    let lambda = lambda.clamp(0.0, 1.0);
    let k = k.min(candidates.len());
    let mut selected: Vec<MmrCandidate> = Vec::with_capacity(k);
    let mut remaining = candidates;

    for _ in 0..k {
        let mut best_idx = 0;
        let mut best_mmr = f32::NEG_INFINITY;

        for (idx, candidate) in remaining.iter().enumerate() {
            let redundancy = selected
                .iter()
                .map(|s| cosine_similarity(&candidate.vector, &s.vector))
                .fold(0.0f32, f32::max);
            let mmr = lambda * candidate.score - (1.0 - lambda) * redundancy;

            // strict comparison keeps the earlier (higher-ranked) candidate on ties
            if mmr > best_mmr {
                best_mmr = mmr;
                best_idx = idx;
            }
        }

        selected.push(remaining.remove(best_idx));
    }

    selected.into_iter().map(|c| (c.id, c.score)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::lexical::term_vector;

    fn candidate(id: usize, score: f32, text: &str) -> MmrCandidate {
        MmrCandidate {
            id,
            score,
            vector: term_vector(text),
        }
    }

    #[test]
    fn test_empty_and_zero_k() {
        assert!(mmr_rerank(Vec::new(), 3, 0.5).is_empty());
        assert!(mmr_rerank(vec![candidate(0, 0.9, "board")], 0, 0.5).is_empty());
    }

    #[test]
    fn test_pure_relevance_keeps_order() {
        let candidates = vec![
            candidate(0, 0.9, "board approves operational risk policy"),
            candidate(1, 0.8, "board approves operational risk policy annually"),
            candidate(2, 0.4, "business continuity testing"),
        ];
        let ranked = mmr_rerank(candidates, 3, 1.0);
        let ids: Vec<usize> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_diversity_demotes_near_duplicates() {
        let candidates = vec![
            candidate(0, 0.9, "board approves operational risk policy"),
            candidate(1, 0.85, "board approves operational risk policy"),
            candidate(2, 0.6, "business continuity testing and disaster recovery"),
        ];
        let ranked = mmr_rerank(candidates, 2, 0.5);
        let ids: Vec<usize> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 2]);
        // original relevance is reported, not the MMR value
        assert_eq!(ranked[1].1, 0.6);
    }
}
