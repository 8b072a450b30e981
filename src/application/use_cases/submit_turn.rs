use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::application::ChatCompletionService;
use crate::domain::{ChatSession, DomainError, Provider};

/// Result of submitting one prompt.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The prompt was empty; nothing happened.
    Ignored,
    /// No credential is saved for the selected provider; nothing was sent.
    MissingCredential { provider: Provider },
    /// The provider answered and the reply was appended to the transcript.
    Replied { content: String },
    /// The call failed. The error is shown to the user but is not part of
    /// the transcript.
    Failed { error: DomainError },
}

impl TurnOutcome {
    pub fn is_replied(&self) -> bool {
        matches!(self, Self::Replied { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn reply(&self) -> Option<&str> {
        match self {
            Self::Replied { content } => Some(content),
            _ => None,
        }
    }

    /// Text to show in place of an assistant reply, if the turn did not
    /// produce one.
    pub fn error_text(&self) -> Option<String> {
        match self {
            Self::MissingCredential { provider } => {
                Some(DomainError::missing_credential(provider.identifier()).to_string())
            }
            Self::Failed { error } => Some(error.to_string()),
            Self::Ignored | Self::Replied { .. } => None,
        }
    }
}

/// Use case for submitting a user prompt within a session.
pub struct SubmitTurnUseCase {
    chat_service: Arc<dyn ChatCompletionService>,
}

impl SubmitTurnUseCase {
    pub fn new(chat_service: Arc<dyn ChatCompletionService>) -> Self {
        Self { chat_service }
    }

    pub async fn execute(&self, session: &mut ChatSession, prompt: &str) -> TurnOutcome {
        if prompt.is_empty() {
            debug!("Ignoring empty prompt");
            return TurnOutcome::Ignored;
        }

        let provider = session.provider();
        let Some(credential) = session.active_credential().map(str::to_owned) else {
            warn!("No credential saved for {}; prompt not sent", provider);
            return TurnOutcome::MissingCredential { provider };
        };

        let messages = session.start_turn(prompt);

        let span = info_span!(
            "turn",
            session = session.id(),
            provider = provider.identifier(),
            persona = session.persona().as_str(),
        );

        let start_time = Instant::now();
        info!(
            "Sending {} messages to {} via {}",
            messages.len(),
            provider.model_name(),
            self.chat_service.name()
        );

        let result = self
            .chat_service
            .complete(provider, &credential, &messages)
            .instrument(span)
            .await;

        let elapsed = start_time.elapsed().as_secs_f64();

        match result {
            Ok(content) => {
                info!("Received {} chars in {:.2}s", content.len(), elapsed);
                session.finish_turn(Some(content.clone()));
                TurnOutcome::Replied { content }
            }
            Err(error) => {
                warn!("Turn failed after {:.2}s: {}", elapsed, error);
                session.finish_turn(None);
                TurnOutcome::Failed { error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockChatCompletion;
    use crate::domain::{Message, Persona, Role, TurnState};

    fn session_with_key() -> ChatSession {
        let mut session = ChatSession::new();
        session.save_credential(Provider::OpenAI, "sk-test");
        session
    }

    #[tokio::test]
    async fn test_successful_turns_grow_transcript_by_two() {
        let mock = Arc::new(MockChatCompletion::new());
        let use_case = SubmitTurnUseCase::new(mock.clone());
        let mut session = session_with_key();

        for i in 0..3 {
            let outcome = use_case.execute(&mut session, &format!("prompt {}", i)).await;
            assert!(outcome.is_replied());
        }

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 6);
        for (i, pair) in transcript.messages().chunks(2).enumerate() {
            assert_eq!(pair[0], Message::user(format!("prompt {}", i)));
            assert_eq!(pair[1].role(), Role::Assistant);
        }
        assert_eq!(session.state(), TurnState::Idle);
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_prompt_is_noop() {
        let mock = Arc::new(MockChatCompletion::new());
        let use_case = SubmitTurnUseCase::new(mock.clone());
        let mut session = session_with_key();

        let outcome = use_case.execute(&mut session, "").await;

        assert!(matches!(outcome, TurnOutcome::Ignored));
        assert!(session.transcript().is_empty());
        assert_eq!(session.active_credential(), Some("sk-test"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_prompt_is_sent_as_is() {
        let mock = Arc::new(MockChatCompletion::new().then_reply("ok"));
        let use_case = SubmitTurnUseCase::new(mock.clone());
        let mut session = session_with_key();

        let outcome = use_case.execute(&mut session, " ").await;

        assert!(outcome.is_replied());
        assert_eq!(session.transcript().messages()[0], Message::user(" "));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_never_calls_provider() {
        let mock = Arc::new(MockChatCompletion::new());
        let use_case = SubmitTurnUseCase::new(mock.clone());
        let mut session = ChatSession::new();
        session.save_credential(Provider::OpenAI, "");

        let outcome = use_case.execute(&mut session, "Hello").await;

        assert!(matches!(
            outcome,
            TurnOutcome::MissingCredential {
                provider: Provider::OpenAI
            }
        ));
        assert!(outcome.error_text().unwrap().contains("OpenAI"));
        assert!(session.transcript().is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_error_out_of_transcript() {
        let mock = Arc::new(MockChatCompletion::new().then_status(500, "rate limited"));
        let use_case = SubmitTurnUseCase::new(mock.clone());
        let mut session = session_with_key();

        let outcome = use_case.execute(&mut session, "Hello").await;

        assert!(outcome.is_failed());
        assert_eq!(outcome.error_text().as_deref(), Some("rate limited"));
        assert_eq!(session.transcript().messages(), &[Message::user("Hello")]);
        assert_eq!(session.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn test_request_carries_persona_and_full_history() {
        let mock = Arc::new(MockChatCompletion::new().then_reply("Hi there"));
        let use_case = SubmitTurnUseCase::new(mock.clone());
        let mut session = session_with_key();

        use_case.execute(&mut session, "Hello").await;
        session.select_persona(Persona::DataAnalysis);
        use_case.execute(&mut session, "Summarise this").await;

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);

        let first = &calls[0];
        assert_eq!(first.provider, Provider::OpenAI);
        assert_eq!(first.credential, "sk-test");
        assert_eq!(
            first.messages,
            vec![
                Message::system(Persona::General.system_prompt()),
                Message::user("Hello"),
            ]
        );

        let second = &calls[1];
        assert_eq!(second.messages.len(), 4);
        assert_eq!(
            second.messages[0],
            Message::system(Persona::DataAnalysis.system_prompt())
        );
        assert_eq!(second.messages[2], Message::assistant("Hi there"));
        assert_eq!(second.messages[3], Message::user("Summarise this"));
    }

    #[tokio::test]
    async fn test_switching_provider_keeps_history() {
        let mock = Arc::new(MockChatCompletion::new().then_reply("first answer"));
        let use_case = SubmitTurnUseCase::new(mock.clone());
        let mut session = session_with_key();
        session.save_credential(Provider::DeepSeek, "sk-deep");

        use_case.execute(&mut session, "Hello").await;
        let before = session.transcript().clone();

        session.select_provider(Provider::DeepSeek);
        use_case.execute(&mut session, "Again").await;

        assert_eq!(&session.transcript().messages()[..2], before.messages());
        let calls = mock.calls();
        assert_eq!(calls[1].provider, Provider::DeepSeek);
        assert_eq!(calls[1].credential, "sk-deep");
    }
}
