use std::sync::Arc;

use tokio::sync::Notify;

/// A wake primitive that lets any thread nudge the event loop.
///
/// Wakes are coalesced: waking a loop that is busy stores a single permit,
/// no matter how many times [`Bridge::wake`] is called. A woken loop may
/// also find nothing to do. Consumers must treat their own queue as the
/// source of truth and never count wakes.
#[derive(Clone, Debug, Default)]
pub struct Bridge {
    notify: Arc<Notify>,
}

impl Bridge {
    /// Creates a new bridge.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wakes the loop. Never blocks.
    #[inline]
    pub fn wake(&self) {
        self.notify.notify_one();
    }

    /// Waits until the bridge is woken.
    ///
    /// Only the event loop thread should wait on a bridge.
    #[inline]
    pub async fn woken(&self) {
        self.notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_wakes_are_coalesced() {
        let bridge = Bridge::new();
        bridge.wake();
        bridge.wake();
        bridge.wake();

        timeout(Duration::from_millis(100), bridge.woken())
            .await
            .unwrap();
        assert!(
            timeout(Duration::from_millis(20), bridge.woken())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_wake_from_other_thread() {
        let bridge = Bridge::new();
        let remote = bridge.clone();
        std::thread::spawn(move || remote.wake()).join().unwrap();
        timeout(Duration::from_millis(100), bridge.woken())
            .await
            .unwrap();
    }
}
