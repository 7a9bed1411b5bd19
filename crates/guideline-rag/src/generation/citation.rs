//! Citation construction from retrieved chunks

use std::collections::HashSet;

use crate::providers::RetrievedResult;
use crate::types::response::Citation;

/// Turns ranked retrieval results into source references
pub struct CitationBuilder;

impl CitationBuilder {
    /// Map results to `(document, section)` citations, keeping the first
    /// occurrence of each pair in rank order.
    pub fn build(results: &[RetrievedResult]) -> Vec<Citation> {
        let mut seen: HashSet<Citation> = HashSet::with_capacity(results.len());
        let mut citations = Vec::with_capacity(results.len());

        for result in results {
            let citation = Citation::from_chunk(&result.chunk);
            if seen.insert(citation.clone()) {
                citations.push(citation);
            }
        }

        citations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, DocumentType, SourceDocument};

    fn result(source: SourceDocument, section: &str, score: f32) -> RetrievedResult {
        RetrievedResult::new(
            Chunk::new("text", source, section, DocumentType::GuidanceNote),
            score,
        )
    }

    #[test]
    fn test_build_empty() {
        assert!(CitationBuilder::build(&[]).is_empty());
    }

    #[test]
    fn test_build_dedups_in_first_seen_order() {
        let results = vec![
            result(SourceDocument::OperationalRiskGuidance, "Board of Directors", 0.9),
            result(SourceDocument::CreditRiskManagement, "Credit Risk Policy", 0.8),
            result(SourceDocument::OperationalRiskGuidance, "Board of Directors", 0.7),
            result(SourceDocument::OperationalRiskGuidance, "Senior Management", 0.6),
            result(SourceDocument::CreditRiskManagement, "Credit Risk Policy", 0.5),
        ];

        let citations = CitationBuilder::build(&results);
        assert_eq!(
            citations,
            vec![
                Citation::new(SourceDocument::OperationalRiskGuidance, "Board of Directors"),
                Citation::new(SourceDocument::CreditRiskManagement, "Credit Risk Policy"),
                Citation::new(SourceDocument::OperationalRiskGuidance, "Senior Management"),
            ]
        );
    }

    #[test]
    fn test_same_section_in_different_documents_is_distinct() {
        let results = vec![
            result(SourceDocument::OperationalRiskGuidance, "Introduction", 0.9),
            result(SourceDocument::LiquidityRiskFramework, "Introduction", 0.8),
        ];
        assert_eq!(CitationBuilder::build(&results).len(), 2);
    }

    #[test]
    fn test_build_never_grows_and_has_no_duplicates() {
        let sources = SourceDocument::ALL;
        let sections = ["Scope", "Governance", "Reporting"];
        let results: Vec<RetrievedResult> = (0..30)
            .map(|i| result(sources[i % 4], sections[i % 3], 1.0 - i as f32 / 30.0))
            .collect();

        let citations = CitationBuilder::build(&results);
        assert!(citations.len() <= results.len());
        let unique: HashSet<&Citation> = citations.iter().collect();
        assert_eq!(unique.len(), citations.len());
        assert_eq!(citations.len(), 12);
    }
}
