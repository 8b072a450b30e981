mod chat_completion_service;

pub use chat_completion_service::*;
