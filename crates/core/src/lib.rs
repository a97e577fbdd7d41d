//! The request-orchestration engine: prompt intake, the sliding-window
//! history, tool resolution and answer publication.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod conversation;
mod error;
mod model_client;
mod orchestrator;
mod session;
pub mod tool;

pub use config::{Config, ConfigBuilder};
pub use conversation::ConversationHistory;
pub use error::{Error, ErrorKind};
pub use orchestrator::{Answer, Orchestrator, OrchestratorBuilder};
