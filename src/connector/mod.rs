//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat completions over HTTP (OpenAI-compatible providers)
//! - A scripted mock for offline use and tests
//! - The container that wires them into use cases

pub mod adapter;
pub mod container;

pub use adapter::*;
pub use container::*;
