//! Query request types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::document::{Chunk, DocumentType, SourceDocument};
use crate::error::{Error, Result};

/// Metadata filter applied by the chunk store before ranking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Restrict to one instrument type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    /// Restrict to one document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_document: Option<SourceDocument>,
    /// Require a topic tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_tag: Option<String>,
}

impl SearchFilter {
    /// Filter that accepts every chunk
    pub fn none() -> Self {
        Self::default()
    }

    /// Filter by document type
    pub fn by_document_type(document_type: DocumentType) -> Self {
        Self {
            document_type: Some(document_type),
            ..Default::default()
        }
    }

    /// Build a filter from untyped `key -> value|null` metadata pairs.
    ///
    /// Null values are ignored. Unknown keys or unparseable values are an
    /// invalid request rather than a silently empty result.
    pub fn from_map(map: &HashMap<String, Option<String>>) -> Result<Self> {
        let mut filter = Self::default();

        for (key, value) in map {
            let Some(value) = value else { continue };
            match key.as_str() {
                "document_type" => {
                    filter.document_type = Some(DocumentType::parse(value).ok_or_else(|| {
                        Error::invalid(format!("Unknown document_type filter: {}", value))
                    })?);
                }
                "source_document" => {
                    let parsed: SourceDocument =
                        serde_json::from_value(serde_json::Value::String(value.clone()))
                            .map_err(|_| {
                                Error::invalid(format!("Unknown source_document filter: {}", value))
                            })?;
                    filter.source_document = Some(parsed);
                }
                "topic_tag" => filter.topic_tag = Some(value.trim().to_lowercase()),
                other => {
                    return Err(Error::invalid(format!("Unsupported filter key: {}", other)));
                }
            }
        }

        Ok(filter)
    }

    /// Whether a chunk passes the filter
    pub fn matches(&self, chunk: &Chunk) -> bool {
        if let Some(document_type) = self.document_type {
            if chunk.document_type != document_type {
                return false;
            }
        }
        if let Some(source) = self.source_document {
            if chunk.source_document != source {
                return false;
            }
        }
        if let Some(tag) = &self.topic_tag {
            if !chunk.has_tag(tag) {
                return false;
            }
        }
        true
    }

    /// True if no constraint is set
    pub fn is_empty(&self) -> bool {
        self.document_type.is_none() && self.source_document.is_none() && self.topic_tag.is_none()
    }
}

/// A question submitted to the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The natural-language question
    pub query: String,

    /// Render recent turns of the session into the prompt
    #[serde(default)]
    pub include_conversation_context: bool,

    /// Conversation session; a new one is opened when absent
    #[serde(default)]
    pub session_id: Option<Uuid>,

    /// Optional metadata filter for retrieval
    #[serde(default)]
    pub filter: SearchFilter,
}

impl AskRequest {
    /// Create a new request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            include_conversation_context: false,
            session_id: None,
            filter: SearchFilter::default(),
        }
    }

    /// Include conversation history in the prompt
    pub fn with_context(mut self) -> Self {
        self.include_conversation_context = true;
        self
    }

    /// Attach to an existing session
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Restrict retrieval
    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(document_type: DocumentType) -> Chunk {
        Chunk::new(
            "Banks shall maintain a minimum Common Equity Tier 1 ratio.",
            SourceDocument::BaselIiiCapitalRegulations,
            "Minimum Capital Requirements",
            document_type,
        )
        .with_tags(["capital adequacy"])
    }

    #[test]
    fn test_filter_from_map() {
        let mut map = HashMap::new();
        map.insert("document_type".to_string(), Some("master_circular".to_string()));
        map.insert("topic_tag".to_string(), None);

        let filter = SearchFilter::from_map(&map).unwrap();
        assert_eq!(filter.document_type, Some(DocumentType::MasterCircular));
        assert!(filter.topic_tag.is_none());
    }

    #[test]
    fn test_filter_from_map_rejects_unknown_key() {
        let mut map = HashMap::new();
        map.insert("author".to_string(), Some("rbi".to_string()));
        assert!(SearchFilter::from_map(&map).is_err());

        let mut map = HashMap::new();
        map.insert("document_type".to_string(), Some("press_release".to_string()));
        assert!(SearchFilter::from_map(&map).is_err());
    }

    #[test]
    fn test_filter_matches() {
        let c = chunk(DocumentType::MasterCircular);
        assert!(SearchFilter::none().matches(&c));
        assert!(SearchFilter::by_document_type(DocumentType::MasterCircular).matches(&c));
        assert!(!SearchFilter::by_document_type(DocumentType::Faq).matches(&c));

        let tagged = SearchFilter {
            topic_tag: Some("Capital Adequacy".to_string()),
            ..Default::default()
        };
        assert!(tagged.matches(&c));
    }

    #[test]
    fn test_ask_request_defaults() {
        let request: AskRequest =
            serde_json::from_str(r#"{"query": "What is the leverage ratio?"}"#).unwrap();
        assert!(!request.include_conversation_context);
        assert!(request.session_id.is_none());
        assert!(request.filter.is_empty());
    }
}
