use uuid::Uuid;

use super::{CredentialRegistry, Message, Persona, Provider, Transcript};

/// Whether a turn is currently waiting on the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Everything one chat session holds: selections, credentials and history.
///
/// Lives only in memory and is passed by `&mut` into the turn flow, which
/// keeps at most one turn in flight per session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    provider: Provider,
    persona: Persona,
    credentials: CredentialRegistry,
    transcript: Transcript,
    state: TurnState,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_credentials(CredentialRegistry::new())
    }

    pub fn with_credentials(credentials: CredentialRegistry) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider: Provider::default(),
            persona: Persona::default(),
            credentials,
            transcript: Transcript::new(),
            state: TurnState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn credentials(&self) -> &CredentialRegistry {
        &self.credentials
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn select_provider(&mut self, provider: Provider) {
        self.provider = provider;
    }

    pub fn select_persona(&mut self, persona: Persona) {
        self.persona = persona;
    }

    pub fn save_credential(&mut self, provider: Provider, secret: impl Into<String>) {
        self.credentials.save(provider, secret);
    }

    /// Credential for the selected provider, if a non-empty one is saved.
    pub fn active_credential(&self) -> Option<&str> {
        self.credentials.get(self.provider)
    }

    pub fn has_usable_credential(&self) -> bool {
        self.active_credential().is_some()
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Messages to send for the next request: the current persona's system
    /// prompt followed by the whole transcript.
    pub fn outbound_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        messages.push(Message::system(self.persona.system_prompt()));
        messages.extend(self.transcript.iter().cloned());
        messages
    }

    /// Record the user's prompt and enter `AwaitingResponse`.
    ///
    /// Returns the messages to send for this turn.
    pub fn start_turn(&mut self, prompt: impl Into<String>) -> Vec<Message> {
        self.transcript.push(Message::user(prompt));
        self.state = TurnState::AwaitingResponse;
        self.outbound_messages()
    }

    /// Return to `Idle`, appending the assistant reply if there is one.
    /// A failed turn passes `None` and leaves the transcript untouched.
    pub fn finish_turn(&mut self, reply: Option<String>) {
        if let Some(content) = reply {
            self.transcript.push(Message::assistant(content));
        }
        self.state = TurnState::Idle;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
