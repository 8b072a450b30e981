use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ChatCompletionService;
use crate::domain::{DomainError, Message, Provider, Role};

/// One request seen by [`MockChatCompletion`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub provider: Provider,
    pub credential: String,
    pub messages: Vec<Message>,
}

enum ScriptedReply {
    Text(String),
    Status(u16, String),
    Transport(String),
}

/// Offline [`ChatCompletionService`] with optionally scripted replies.
///
/// Scripted replies are consumed in order. Once the script runs out, every
/// call echoes the latest user message back. All calls are recorded.
#[derive(Default)]
pub struct MockChatCompletion {
    script: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChatCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_reply(self, content: impl Into<String>) -> Self {
        self.push(ScriptedReply::Text(content.into()))
    }

    pub fn then_status(self, status: u16, body: impl Into<String>) -> Self {
        self.push(ScriptedReply::Status(status, body.into()))
    }

    pub fn then_transport_error(self, message: impl Into<String>) -> Self {
        self.push(ScriptedReply::Transport(message.into()))
    }

    fn push(self, reply: ScriptedReply) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn echo(provider: Provider, messages: &[Message]) -> String {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::User)
            .map(|m| m.content())
            .unwrap_or_default();
        format!("[{}] You said: {}", provider.model_name(), last_user)
    }
}

#[async_trait]
impl ChatCompletionService for MockChatCompletion {
    async fn complete(
        &self,
        provider: Provider,
        credential: &str,
        messages: &[Message],
    ) -> Result<String, DomainError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                provider,
                credential: credential.to_string(),
                messages: messages.to_vec(),
            });
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        debug!("Mock completion for {} (scripted={})", provider, next.is_some());

        match next {
            Some(ScriptedReply::Text(content)) => Ok(content),
            Some(ScriptedReply::Status(status, body)) => Err(DomainError::provider(status, body)),
            Some(ScriptedReply::Transport(message)) => Err(DomainError::transport(message)),
            None => Ok(Self::echo(provider, messages)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
