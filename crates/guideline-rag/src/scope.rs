//! Scope classification and topic tagging
//!
//! A question is in scope when its content words overlap a known topic's
//! keywords and the chunk store returned enough relevant evidence.

use serde::Serialize;
use std::collections::HashSet;

use crate::config::{ScopeConfig, TopicDefinition};
use crate::providers::RetrievedResult;
use crate::retrieval::lexical::{term_set, tokenize};

/// Why a question was classified as out of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeRejection {
    /// No known topic shares enough words with the question
    NoTopicOverlap,
    /// Too few retrieved chunks clear the relevance threshold
    InsufficientEvidence,
}

/// Outcome of scope classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeDecision {
    pub in_scope: bool,
    /// Best-matching topic, if any topic overlapped at all
    pub topic: Option<String>,
    pub rejection: Option<ScopeRejection>,
}

impl ScopeDecision {
    fn accept(topic: String) -> Self {
        Self {
            in_scope: true,
            topic: Some(topic),
            rejection: None,
        }
    }

    fn reject(topic: Option<String>, rejection: ScopeRejection) -> Self {
        Self {
            in_scope: false,
            topic,
            rejection: Some(rejection),
        }
    }
}

struct TopicKeywords {
    name: String,
    keywords: HashSet<String>,
}

/// Lexical scope classifier over a fixed topic catalogue
pub struct ScopeClassifier {
    topics: Vec<TopicKeywords>,
    min_keyword_overlap: usize,
    min_relevance_score: f32,
    min_relevant_results: usize,
}

impl ScopeClassifier {
    /// Create a classifier from configuration
    pub fn new(config: &ScopeConfig) -> Self {
        let topics = config
            .topics
            .iter()
            .map(|TopicDefinition { name, keywords }| TopicKeywords {
                name: name.clone(),
                // keywords go through the same normalization as queries
                keywords: keywords.iter().flat_map(|k| tokenize(k)).collect(),
            })
            .collect();

        Self {
            topics,
            min_keyword_overlap: config.min_keyword_overlap.max(1),
            min_relevance_score: config.min_relevance_score,
            min_relevant_results: config.min_relevant_results.max(1),
        }
    }

    /// Best topic and its overlap count; ties resolve to catalogue order
    fn best_topic(&self, query: &str) -> Option<(&str, usize)> {
        let words = term_set(query);
        let mut best: Option<(&str, usize)> = None;

        for topic in &self.topics {
            let overlap = topic.keywords.intersection(&words).count();
            if overlap > 0 && best.map_or(true, |(_, b)| overlap > b) {
                best = Some((topic.name.as_str(), overlap));
            }
        }

        best
    }

    /// Lexical classification of the question alone
    pub fn classify(&self, query: &str) -> ScopeDecision {
        match self.best_topic(query) {
            Some((topic, overlap)) if overlap >= self.min_keyword_overlap => {
                ScopeDecision::accept(topic.to_string())
            }
            Some((topic, _)) => {
                ScopeDecision::reject(Some(topic.to_string()), ScopeRejection::NoTopicOverlap)
            }
            None => ScopeDecision::reject(None, ScopeRejection::NoTopicOverlap),
        }
    }

    /// Classification of the question together with its retrieval results
    pub fn classify_with_results(&self, query: &str, results: &[RetrievedResult]) -> ScopeDecision {
        let decision = self.classify(query);
        if !decision.in_scope {
            return decision;
        }

        let supporting = self.relevant_results(results).count();
        if supporting < self.min_relevant_results {
            tracing::debug!(
                "Insufficient evidence: {} of {} results >= {}",
                supporting,
                results.len(),
                self.min_relevance_score
            );
            return ScopeDecision::reject(decision.topic, ScopeRejection::InsufficientEvidence);
        }

        decision
    }

    /// Results whose relevance clears the configured threshold, in rank order
    pub fn relevant_results<'a>(
        &'a self,
        results: &'a [RetrievedResult],
    ) -> impl Iterator<Item = &'a RetrievedResult> + 'a {
        results
            .iter()
            .filter(move |r| r.relevance_score >= self.min_relevance_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, DocumentType, SourceDocument};

    fn classifier() -> ScopeClassifier {
        ScopeClassifier::new(&ScopeConfig::default())
    }

    fn result(score: f32) -> RetrievedResult {
        RetrievedResult::new(
            Chunk::new(
                "The Board shall oversee operational risk.",
                SourceDocument::OperationalRiskGuidance,
                "Board of Directors",
                DocumentType::GuidanceNote,
            ),
            score,
        )
    }

    #[test]
    fn test_unrelated_question_is_out_of_scope() {
        let decision = classifier().classify("How do I bake a cake?");
        assert!(!decision.in_scope);
        assert_eq!(decision.topic, None);
        assert_eq!(decision.rejection, Some(ScopeRejection::NoTopicOverlap));
    }

    #[test]
    fn test_topic_tagging() {
        let c = classifier();
        assert_eq!(
            c.classify("What are board responsibilities for operational risk?").topic.as_deref(),
            Some("operational risk")
        );
        assert_eq!(
            c.classify("How should banks monitor credit risk?").topic.as_deref(),
            Some("credit risk")
        );
        assert_eq!(
            c.classify("What are capital adequacy guidelines?").topic.as_deref(),
            Some("capital adequacy")
        );
        assert_eq!(
            c.classify("What are technology risk controls?").topic.as_deref(),
            Some("technology risk")
        );
    }

    #[test]
    fn test_ties_resolve_to_catalogue_order() {
        let decision = classifier().classify("risk");
        assert_eq!(decision.topic.as_deref(), Some("operational risk"));
    }

    #[test]
    fn test_overlap_threshold() {
        let config = ScopeConfig {
            min_keyword_overlap: 2,
            ..Default::default()
        };
        let c = ScopeClassifier::new(&config);
        let weak = c.classify("Tell me about collateral");
        assert!(!weak.in_scope);
        assert_eq!(weak.topic.as_deref(), Some("credit risk"));
        assert!(c.classify("collateral for credit exposures").in_scope);
    }

    #[test]
    fn test_requires_relevant_results() {
        let c = classifier();
        let query = "What are board responsibilities for operational risk?";

        let none = c.classify_with_results(query, &[]);
        assert!(!none.in_scope);
        assert_eq!(none.rejection, Some(ScopeRejection::InsufficientEvidence));
        assert_eq!(none.topic.as_deref(), Some("operational risk"));

        let weak = c.classify_with_results(query, &[result(0.01)]);
        assert!(!weak.in_scope);

        let strong = c.classify_with_results(query, &[result(0.01), result(0.6)]);
        assert!(strong.in_scope);
        assert_eq!(c.relevant_results(&[result(0.01), result(0.6)]).count(), 1);
    }

    #[test]
    fn test_min_relevant_results_floor() {
        let config = ScopeConfig {
            min_relevant_results: 0,
            ..Default::default()
        };
        let c = ScopeClassifier::new(&config);
        assert!(!c.classify_with_results("credit risk policy", &[]).in_scope);
    }
}
