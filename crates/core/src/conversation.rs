//! Conversation-related types.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use aiagent_model::Message;

/// A bounded, thread-safe sliding window over the conversation.
///
/// Messages are kept in insertion order. Appending to a full window evicts
/// the oldest message first, so the window never holds more than its
/// capacity.
#[derive(Debug)]
pub struct ConversationHistory {
    messages: Mutex<VecDeque<Message>>,
    capacity: usize,
}

impl ConversationHistory {
    /// Creates an empty history holding at most `capacity` messages.
    ///
    /// A capacity of zero is treated as one.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a message, evicting the oldest one if the window is full.
    pub fn append(&self, message: Message) {
        let mut messages = self.lock();
        if messages.len() >= self.capacity {
            if let Some(evicted) = messages.pop_front() {
                trace!("evicted a {} message from history", evicted.role);
            }
        }
        messages.push_back(message);
    }

    /// Returns a consistent copy of the whole window, oldest first.
    #[inline]
    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().iter().cloned().collect()
    }

    /// Returns the number of messages in the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the maximum number of messages kept.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let history = ConversationHistory::with_capacity(3);
        for i in 0..4 {
            history.append(Message::user(format!("msg {i}")));
        }

        let contents: Vec<_> = history
            .snapshot()
            .into_iter()
            .map(|msg| msg.content)
            .collect();
        assert_eq!(contents, vec!["msg 1", "msg 2", "msg 3"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_zero_capacity() {
        let history = ConversationHistory::with_capacity(0);
        history.append(Message::user("a"));
        history.append(Message::user("b"));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.snapshot(), vec![Message::user("b")]);
    }

    #[test]
    fn test_concurrent_appends() {
        let history = Arc::new(ConversationHistory::with_capacity(50));

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let history = Arc::clone(&history);
                thread::spawn(move || {
                    for i in 0..200 {
                        history.append(Message::user(format!("{w}:{i}")));
                    }
                })
            })
            .collect();
        let reader = {
            let history = Arc::clone(&history);
            thread::spawn(move || {
                for _ in 0..200 {
                    assert!(history.snapshot().len() <= 50);
                }
            })
        };
        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 50);
        // Within the window, each writer's messages are still in order.
        for w in 0..4 {
            let prefix = format!("{w}:");
            let seq: Vec<usize> = snapshot
                .iter()
                .filter_map(|msg| msg.content.strip_prefix(&prefix))
                .map(|i| i.parse().unwrap())
                .collect();
            assert!(seq.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
