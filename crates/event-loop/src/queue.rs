use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// An unbounded FIFO queue shared between threads.
///
/// Every operation holds the lock only for the in-memory update, so the
/// queue can be used from the event loop without stalling it.
#[derive(Debug)]
pub struct SharedQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> Default for SharedQueue<T> {
    #[inline]
    fn default() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }
}

impl<T> SharedQueue<T> {
    /// Creates an empty queue.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        // A panic while holding the lock can't leave a `VecDeque` in a
        // broken state, so poisoning is ignored.
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends an item to the back of the queue.
    pub fn push(&self, item: T) {
        self.lock().push_back(item);
        self.available.notify_one();
    }

    /// Pops the front item without blocking.
    #[inline]
    pub fn try_pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Pops the front item, waiting up to `timeout` for one to arrive.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut items = self.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            items = self
                .available
                .wait_timeout(items, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Takes every queued item, oldest first.
    #[inline]
    pub fn drain(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }

    /// Returns the number of queued items.
    #[inline]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_fifo() {
        let queue = SharedQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.try_pop(), Some(1));
        assert_eq!(queue.drain(), vec![2, 3]);
        assert!(queue.is_empty());
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_pop_timeout() {
        let queue = Arc::new(SharedQueue::new());
        assert_eq!(queue.pop_timeout(Duration::from_millis(10)), None);

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                queue.push("ready");
            })
        };
        assert_eq!(queue.pop_timeout(Duration::from_secs(5)), Some("ready"));
        producer.join().unwrap();
    }

    #[test]
    fn test_many_producers() {
        let queue = Arc::new(SharedQueue::new());
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..100 {
                        queue.push((p, i));
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let items = queue.drain();
        assert_eq!(items.len(), 400);
        // Items from one producer keep their relative order.
        for p in 0..4 {
            let seq: Vec<_> = items
                .iter()
                .filter(|(q, _)| *q == p)
                .map(|(_, i)| *i)
                .collect();
            assert_eq!(seq, (0..100).collect::<Vec<_>>());
        }
    }
}
