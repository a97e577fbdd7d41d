//! Plumbing for running a single-threaded event loop that other threads
//! feed through lock-protected queues.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod bridge;
mod error;
mod handle;
mod queue;
mod scheduler;

pub use bridge::Bridge;
pub use error::SpawnError;
pub use handle::{EventLoop, EventLoopHandle};
pub use queue::SharedQueue;
