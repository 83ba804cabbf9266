//! Rolling conversation context for chat requests
//!
//! Keeps the most recent turns of the conversation and formats them
//! for the chat completions payload.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many turns the rolling context keeps by default
pub const DEFAULT_CONTEXT_ENTRIES: usize = 45;

/// Role of a message in the chat payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant response
    Assistant,
}

impl ChatRole {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single role/content pair in the chat payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextEntry {
    pub role: ChatRole,
    pub content: String,
}

impl ContextEntry {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system entry
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Create a user entry
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create an assistant entry
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Bounded window over the conversation history. Once full, adding a
/// turn evicts the oldest one.
#[derive(Clone, Debug)]
pub struct ContextWindow {
    entries: VecDeque<ContextEntry>,
    max_entries: usize,
}

impl ContextWindow {
    /// Create a window keeping at most `max_entries` turns
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Add a user turn
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add(ContextEntry::user(content));
    }

    /// Add an assistant turn
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add(ContextEntry::assistant(content));
    }

    fn add(&mut self, entry: ContextEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Copy of the window contents, oldest first
    pub fn snapshot(&self) -> Vec<ContextEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_ENTRIES)
    }
}
