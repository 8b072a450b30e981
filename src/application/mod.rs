//! # Application Layer
//!
//! The chat-completion port and the turn-submission use case that drives it.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
