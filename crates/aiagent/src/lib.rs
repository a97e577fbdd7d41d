//! An out-of-the-box agent that assembles the orchestrator, the HTTP
//! transport and the built-in tools.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring agent functionality into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod tools;

/// Re-exports of [`aiagent_core`] crate.
pub mod core {
    pub use aiagent_core::*;
}

/// Re-exports of [`aiagent_http`] crate.
pub mod http {
    pub use aiagent_http::*;
}

/// Re-exports of [`aiagent_model`] crate.
pub mod model {
    pub use aiagent_model::*;
}
