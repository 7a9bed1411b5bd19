//! Prompt templates for guideline answers

use crate::providers::RetrievedResult;
use crate::types::conversation::ConversationEntry;
use crate::types::response::Citation;

/// Prompt builder for guideline queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build numbered context blocks from retrieved chunks
    pub fn build_context(results: &[RetrievedResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            let chunk = &result.chunk;
            context.push_str(&format!(
                "[{}] {} ({}), Section: {}\n\n{}\n\n---\n\n",
                i + 1,
                chunk.source_document.title(),
                chunk.document_type.display_name(),
                chunk.section_title,
                chunk.text.trim()
            ));
        }

        context
    }

    /// Render prior turns, oldest first
    pub fn build_history(history: &[ConversationEntry]) -> String {
        history
            .iter()
            .map(|entry| format!("User: {}\nAssistant: {}", entry.query, entry.response))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full answer prompt
    pub fn build_answer_prompt(
        question: &str,
        results: &[RetrievedResult],
        citations: &[Citation],
        history: &[ConversationEntry],
    ) -> String {
        let history_block = if history.is_empty() {
            String::new()
        } else {
            format!(
                "\nPREVIOUS CONVERSATION (for reference only):\n{}\n",
                Self::build_history(history)
            )
        };

        format!(
            r#"You are a professional assistant specializing in Reserve Bank of India (RBI) guidelines and risk management.

INSTRUCTIONS:
1. Answer ONLY from the guideline extracts in the CONTEXT below
2. Write in a formal, precise compliance register suitable for a bank's risk and compliance function
3. Cite every requirement you state in this format: [Source: document title, Section: section title]
4. If the extracts do not contain the answer, state that the provided guidelines do not address it
5. Do not speculate about requirements that are not stated in the extracts
{history_block}
CONTEXT FROM GUIDELINES:
{context}
AVAILABLE SOURCES:
{sources}

QUESTION: {question}

Provide a clear, professional answer with citations:"#,
            history_block = history_block,
            context = Self::build_context(results),
            sources = Self::format_sources_list(citations),
            question = question.trim()
        )
    }

    /// Format sources list for the prompt
    fn format_sources_list(citations: &[Citation]) -> String {
        citations
            .iter()
            .enumerate()
            .map(|(i, c)| format!("[{}] {}, Section: {}", i + 1, c.source_document.title(), c.section_title))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
