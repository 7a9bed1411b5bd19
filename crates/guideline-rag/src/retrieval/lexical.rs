//! Lexical term extraction and sparse cosine similarity

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").expect("valid word regex"));

const STOPWORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "could", "do", "does", "for",
    "from", "has", "have", "how", "i", "if", "in", "is", "it", "its", "me", "my", "of", "on", "or",
    "our", "shall", "should", "so", "tell", "that", "the", "their", "there", "these", "this", "to",
    "under", "was", "we", "what", "when", "where", "which", "who", "why", "will", "with", "would",
    "you", "your",
];

/// Sparse term-frequency vector
pub type TermVector = HashMap<String, f32>;

/// Reduce simple English plurals so "controls" matches "control"
fn stem(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        format!("{}y", &word[..word.len() - 3])
    } else if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Lower-cased, stop-word-free, lightly stemmed content words in order
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.len() > 1 && !STOPWORDS.contains(w))
        .map(stem)
        .collect()
}

/// Distinct content words
pub fn term_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Term-frequency vector of a text
pub fn term_vector(text: &str) -> TermVector {
    let mut vector = TermVector::new();
    for token in tokenize(text) {
        *vector.entry(token).or_insert(0.0) += 1.0;
    }
    vector
}

/// Euclidean norm of a sparse vector
pub fn magnitude(vector: &TermVector) -> f32 {
    vector.values().map(|v| v * v).sum::<f32>().sqrt()
}

/// Cosine similarity of two sparse vectors (0.0 when either is empty)
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f32 = small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum();

    let denom = magnitude(a) * magnitude(b);
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stopwords_and_punctuation() {
        let tokens = tokenize("What are the Board's responsibilities for operational risk?");
        assert_eq!(tokens, vec!["board", "responsibility", "operational", "risk"]);
    }

    #[test]
    fn test_stem_keeps_double_s() {
        assert_eq!(stem("process"), "process");
        assert_eq!(stem("controls"), "control");
        assert_eq!(stem("policies"), "policy");
        assert_eq!(stem("gas"), "gas");
    }

    #[test]
    fn test_cosine_similarity() {
        let a = term_vector("credit risk credit");
        let b = term_vector("credit risk");
        let c = term_vector("liquidity coverage");

        let ab = cosine_similarity(&a, &b);
        assert!(ab > 0.9 && ab <= 1.0);
        assert_eq!(cosine_similarity(&a, &c), 0.0);
        assert_eq!(cosine_similarity(&a, &TermVector::new()), 0.0);
    }
}
