use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Empty assistant message, filled in fragment by fragment while
    /// a response streams.
    pub fn assistant() -> Self {
        Self::new(Sender::Assistant, String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_keeps_text() {
        let message = Message::user("hello");
        assert_eq!(message.sender, Sender::User);
        assert_eq!(message.text, "hello");
    }

    #[test]
    fn assistant_placeholder_starts_empty() {
        let message = Message::assistant();
        assert_eq!(message.sender, Sender::Assistant);
        assert!(message.text.is_empty());
    }

    #[test]
    fn messages_get_unique_ids() {
        let a = Message::user("a");
        let b = Message::user("b");
        assert_ne!(a.id, b.id);
    }
}
