use super::types::Message;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Chronological record of the conversation. Streamed response text is
/// patched into messages in place, looked up by id rather than by
/// scanning the list.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    inner: Arc<RwLock<LogInner>>,
}

#[derive(Debug, Default)]
struct LogInner {
    messages: Vec<Message>,
    by_id: HashMap<Uuid, usize>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LogInner::default())),
        }
    }

    pub fn add(&self, message: Message) -> Uuid {
        let mut inner = self.inner.write();
        let id = message.id;
        let index = inner.messages.len();
        inner.by_id.insert(id, index);
        inner.messages.push(message);
        id
    }

    /// Append streamed text to the message with the given id. Returns
    /// false when the id is unknown, e.g. the log was cleared while a
    /// response was still in flight.
    pub fn append_fragment(&self, id: Uuid, fragment: &str) -> bool {
        let mut inner = self.inner.write();
        let index = match inner.by_id.get(&id) {
            Some(&index) => index,
            None => {
                debug!("Dropping fragment for unknown message {}", id);
                return false;
            }
        };
        inner.messages[index].text.push_str(fragment);
        true
    }

    pub fn text_of(&self, id: Uuid) -> Option<String> {
        let inner = self.inner.read();
        inner
            .by_id
            .get(&id)
            .map(|&index| inner.messages[index].text.clone())
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.inner.read().messages.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.messages.clear();
        inner.by_id.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().messages.is_empty()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Sender;

    #[test]
    fn add_preserves_order() {
        let log = ConversationLog::new();
        log.add(Message::user("first"));
        log.add(Message::assistant());
        log.add(Message::user("second"));

        let messages = log.get_all();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert_eq!(messages[2].text, "second");
    }

    #[test]
    fn fragments_concatenate_in_arrival_order() {
        let log = ConversationLog::new();
        let id = log.add(Message::assistant());

        assert!(log.append_fragment(id, "Hel"));
        assert_eq!(log.text_of(id).as_deref(), Some("Hel"));
        assert!(log.append_fragment(id, "lo, "));
        assert!(log.append_fragment(id, "world"));

        assert_eq!(log.text_of(id).as_deref(), Some("Hello, world"));
    }

    #[test]
    fn fragment_targets_its_message_not_the_last_one() {
        let log = ConversationLog::new();
        let first = log.add(Message::assistant());
        log.add(Message::user("next question"));
        let second = log.add(Message::assistant());

        log.append_fragment(first, "late fragment");
        log.append_fragment(second, "current");

        assert_eq!(log.text_of(first).as_deref(), Some("late fragment"));
        assert_eq!(log.text_of(second).as_deref(), Some("current"));
    }

    #[test]
    fn fragments_after_clear_are_dropped() {
        let log = ConversationLog::new();
        let id = log.add(Message::assistant());
        log.append_fragment(id, "partial");
        log.clear();

        assert!(!log.append_fragment(id, "stale"));
        assert!(log.is_empty());
        assert_eq!(log.text_of(id), None);
    }

    #[test]
    fn clear_then_add_reindexes_from_scratch() {
        let log = ConversationLog::new();
        log.add(Message::user("old"));
        log.clear();

        let id = log.add(Message::assistant());
        assert!(log.append_fragment(id, "fresh"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.text_of(id).as_deref(), Some("fresh"));
    }
}
