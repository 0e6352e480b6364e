//! Conversation memory
//!
//! An in-process store of finished turns. Search is keyword overlap: an entry
//! matches when it shares at least one word with the query. Nothing is
//! persisted; memory lasts as long as the process.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::debug;

use lessonstore::Status;

/// One remembered piece of conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryEntry {
    /// `user` or the name of the agent that answered
    pub author: String,
    pub text: String,
    pub recorded_at: DateTime<Local>,
}

/// Result of `load_memory`
#[derive(Debug, Clone, Serialize)]
pub struct MemorySearch {
    pub status: Status,
    pub query: String,
    pub count: usize,
    pub memories: Vec<MemoryEntry>,
}

/// In-process memory shared by every agent in a session
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember one piece of text
    pub async fn add(&self, author: impl Into<String>, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        let entry = MemoryEntry {
            author: author.into(),
            text,
            recorded_at: Local::now(),
        };
        debug!(author = %entry.author, text_len = entry.text.len(), "MemoryStore::add: called");
        self.entries.lock().await.push(entry);
    }

    /// Remember a finished turn: what the user said and what the agent answered
    pub async fn record_turn(&self, user_text: &str, agent: &str, answer: &str) {
        self.add("user", user_text).await;
        self.add(agent, answer).await;
    }

    /// Entries sharing at least one word with `query`, oldest first
    pub async fn search(&self, query: &str) -> Vec<MemoryEntry> {
        let wanted = words(query);
        debug!(%query, words = wanted.len(), "MemoryStore::search: called");
        if wanted.is_empty() {
            return Vec::new();
        }
        self.entries
            .lock()
            .await
            .iter()
            .filter(|entry| !words(&entry.text).is_disjoint(&wanted))
            .cloned()
            .collect()
    }

    /// Search wrapped as a tool outcome
    pub async fn load(&self, query: &str) -> MemorySearch {
        let memories = self.search(query).await;
        MemorySearch {
            status: Status::Success,
            query: query.to_string(),
            count: memories.len(),
            memories,
        }
    }

    /// Instruction section listing memories relevant to `query`, if any
    pub async fn preload_section(&self, query: &str) -> Option<String> {
        let memories = self.search(query).await;
        if memories.is_empty() {
            return None;
        }
        let mut section = String::from("\n\n## Relevant memories from earlier in this session\n\n");
        for entry in memories {
            section.push_str(&format!(
                "- [{}] {}: {}\n",
                entry.recorded_at.format("%Y-%m-%d %H:%M"),
                entry.author,
                entry.text
            ));
        }
        Some(section)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

/// Lowercased alphanumeric words of `text`
fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_matches_shared_word() {
        let memory = MemoryStore::new();
        memory.record_turn("I want to learn FastAPI", "main_agent", "Here is your roadmap").await;
        memory.add("user", "Rust ownership is confusing").await;

        let hits = memory.search("fastapi progress").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].author, "user");
        assert!(hits[0].text.contains("FastAPI"));

        assert!(memory.search("kotlin").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_ignores_punctuation_and_case() {
        let memory = MemoryStore::new();
        memory.add("main_agent", "Module 1: Fundamentals!").await;

        assert_eq!(memory.search("FUNDAMENTALS?").await.len(), 1);
        assert!(memory.search("   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_text_not_recorded() {
        let memory = MemoryStore::new();
        memory.record_turn("hello", "main_agent", "  ").await;
        assert_eq!(memory.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_outcome() {
        let memory = MemoryStore::new();
        memory.add("user", "started module 2").await;

        let outcome = memory.load("module").await;
        assert_eq!(outcome.status, Status::Success);
        assert_eq!(outcome.count, 1);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["memories"][0]["text"], "started module 2");
    }

    #[tokio::test]
    async fn test_preload_section() {
        let memory = MemoryStore::new();
        assert!(memory.preload_section("anything").await.is_none());

        memory.add("user", "learning LangChain").await;
        let section = memory.preload_section("langchain module 1").await.unwrap();
        assert!(section.contains("Relevant memories"));
        assert!(section.contains("user: learning LangChain"));
    }
}
