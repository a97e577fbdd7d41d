use std::thread::{self, JoinHandle};

use tokio::runtime::Builder as RuntimeBuilder;
use tokio::sync::watch;
use tracing::Instrument;

use crate::SpawnError;
use crate::scheduler::run_event_loop;

/// Entry for bringing up an event loop on a dedicated thread.
pub struct EventLoop;

impl EventLoop {
    /// Spawns a new thread named `label` and runs the future produced by
    /// `make_loop` on it.
    ///
    /// The thread owns a current-thread runtime, so every task spawned by
    /// the loop runs on that single thread. The thread exits when the loop
    /// future completes or the loop is killed.
    pub fn spawn<F, Fut>(
        label: &str,
        make_loop: F,
    ) -> Result<EventLoopHandle, SpawnError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SpawnError::runtime)?;
        let (kill_tx, kill_rx) = watch::channel(false);
        let span = trace_span!("event loop", label = label);
        let thread = thread::Builder::new()
            .name(label.to_owned())
            .spawn(move || {
                runtime.block_on(
                    run_event_loop(make_loop(), kill_rx).instrument(span),
                );
            })
            .map_err(SpawnError::thread)?;
        Ok(EventLoopHandle { kill_tx, thread })
    }
}

/// Handle to a running event loop.
pub struct EventLoopHandle {
    kill_tx: watch::Sender<bool>,
    thread: JoinHandle<()>,
}

impl EventLoopHandle {
    /// Attempts to kill the event loop.
    ///
    /// The loop is not guaranteed to stop immediately, but it will not
    /// start handling another event.
    #[inline]
    pub fn try_kill(&self) {
        self.kill_tx.send(true).ok();
    }

    /// Returns `true` if the loop thread has exited.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Returns `true` if called from the loop thread itself.
    #[inline]
    pub fn is_current_thread(&self) -> bool {
        self.thread.thread().id() == thread::current().id()
    }

    /// Kills the loop and waits for its thread to exit.
    ///
    /// Called from the loop thread, this only kills the loop.
    pub fn shutdown(self) {
        self.try_kill();
        if self.is_current_thread() {
            return;
        }
        if self.thread.join().is_err() {
            error!("event loop thread panicked");
        }
    }
}
