//! Per-session conversation history
//!
//! A tracker is owned by one session and shared by reference across its
//! requests. Appends from concurrent requests are serialized by the lock.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

use crate::types::{ConversationEntry, ConversationSummary};

/// Ordered, append-only history of one session
pub struct ConversationTracker {
    id: Uuid,
    created_at: DateTime<Utc>,
    entries: RwLock<VecDeque<ConversationEntry>>,
    /// Oldest turns are evicted beyond this many entries
    max_entries: Option<usize>,
}

impl ConversationTracker {
    /// Create an unbounded tracker with a fresh session id
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4(), None)
    }

    /// Create a tracker that keeps at most `max_entries` turns
    pub fn with_capacity_limit(max_entries: Option<usize>) -> Self {
        Self::with_id(Uuid::new_v4(), max_entries)
    }

    /// Create a tracker for a known session id
    pub fn with_id(id: Uuid, max_entries: Option<usize>) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            entries: RwLock::new(VecDeque::new()),
            max_entries: max_entries.filter(|&n| n > 0),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append a turn
    pub fn record(&self, entry: ConversationEntry) {
        let mut entries = self.entries.write();
        entries.push_back(entry);

        if let Some(max) = self.max_entries {
            while entries.len() > max {
                entries.pop_front();
            }
        }
    }

    /// Aggregate statistics over the retained history
    pub fn summary(&self) -> ConversationSummary {
        let entries = self.entries.read();
        let mut sources = HashSet::new();
        let mut summary = ConversationSummary {
            total_questions: entries.len(),
            ..Default::default()
        };

        for entry in entries.iter() {
            sources.extend(entry.sources.iter());
            if let Some(topic) = &entry.topic {
                summary.topics_seen.insert(topic.clone());
            }
            if !entry.in_scope {
                summary.out_of_scope_questions += 1;
            }
        }

        summary.unique_sources = sources.len();
        summary
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> Vec<ConversationEntry> {
        let entries = self.entries.read();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Full retained history, oldest first
    pub fn history(&self) -> Vec<ConversationEntry> {
        self.entries.read().iter().cloned().collect()
    }

    /// Drop all turns
    pub fn clear(&self) {
        self.entries.write().clear();
        tracing::debug!("Cleared conversation {}", self.id);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for ConversationTracker {
    fn default() -> Self {
        Self::new()
    }
}
