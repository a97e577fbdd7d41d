//! The data model shared by the orchestrator and its collaborators.
//!
//! This crate describes the chat-completions conversation (messages, tool
//! calls, tool definitions and responses), the [`Transport`] seam used to
//! reach the remote model, and the [`codec`] that turns the conversation
//! into the JSON payload dictated by the remote API and back.
//!
//! Types in this crate don't schedule or execute anything. The engine that
//! drives round trips lives in its own crate.

#![deny(missing_docs)]

pub mod codec;
mod error;
mod message;
mod request;
mod response;
mod tool;
mod transport;
mod value;

pub use error::*;
pub use message::*;
pub use request::*;
pub use response::*;
pub use tool::*;
pub use transport::*;
pub use value::*;
