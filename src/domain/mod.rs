//! # Domain Layer
//!
//! Session state, messages, personas and the static provider registry.
//! This layer knows nothing about HTTP clients or the terminal.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
