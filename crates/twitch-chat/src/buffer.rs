//! Bounded rolling window of recent chat messages.

use std::collections::VecDeque;

use crate::ChatMessage;

/// Number of messages kept for display and game input.
pub const MAX_MESSAGES: usize = 50;

#[derive(Debug, Clone)]
pub struct MessageBuffer {
    entries: VecDeque<ChatMessage>,
    capacity: usize,
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_MESSAGES)
    }
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting the oldest one when full.
    pub fn push(&mut self, msg: ChatMessage) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(msg);
    }

    pub fn latest(&self) -> Option<&ChatMessage> {
        self.entries.back()
    }

    /// Messages oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> usize {
        let cleared = self.entries.len();
        self.entries.clear();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(idx: usize) -> ChatMessage {
        ChatMessage {
            id: format!("id-{idx}"),
            username: "u".to_string(),
            message: format!("m{idx}"),
            color: "#FFFFFF".to_string(),
        }
    }

    #[test]
    fn keeps_only_the_most_recent_fifty() {
        let mut buffer = MessageBuffer::new();
        for idx in 0..75 {
            buffer.push(msg(idx));
        }
        assert_eq!(buffer.len(), MAX_MESSAGES);
        let messages = buffer.messages();
        assert_eq!(messages[0].message, "m25");
        assert_eq!(buffer.latest().map(|m| m.message.as_str()), Some("m74"));
    }

    #[test]
    fn clear_returns_removed_count() {
        let mut buffer = MessageBuffer::new();
        buffer.push(msg(0));
        buffer.push(msg(1));
        assert_eq!(buffer.clear(), 2);
        assert!(buffer.is_empty());
        assert!(buffer.latest().is_none());
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut buffer = MessageBuffer::with_capacity(0);
        buffer.push(msg(0));
        buffer.push(msg(1));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.latest().map(|m| m.id.as_str()), Some("id-1"));
    }
}
