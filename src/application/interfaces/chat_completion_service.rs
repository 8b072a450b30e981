use async_trait::async_trait;

use crate::domain::{DomainError, Message, Provider};

/// Sends one chat-completions request and returns the assistant's text.
///
/// Implementors own transport, serialization and vendor details. Each call
/// makes exactly one request, with no retries and no local side effects.
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Send `messages` to `provider` authenticated with `credential` and
    /// return the first choice's content.
    async fn complete(
        &self,
        provider: Provider,
        credential: &str,
        messages: &[Message],
    ) -> Result<String, DomainError>;

    /// Short name for logging.
    fn name(&self) -> &str;
}
