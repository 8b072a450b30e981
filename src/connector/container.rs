use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::application::{ChatCompletionService, SubmitTurnUseCase};
use crate::connector::{HttpChatCompletion, MockChatCompletion};
use crate::domain::{ChatSession, Persona, Provider};

#[derive(Default)]
pub struct ContainerConfig {
    /// Answer locally instead of calling any provider.
    pub mock: bool,
    /// Deadline for each outbound request. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Base URL replacing every provider's scheme and host.
    pub endpoint: Option<String>,
    pub provider: Provider,
    pub persona: Persona,
}

pub struct Container {
    chat_service: Arc<dyn ChatCompletionService>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let chat_service: Arc<dyn ChatCompletionService> = if config.mock {
            debug!("Using mock chat completion service");
            Arc::new(MockChatCompletion::new())
        } else {
            let client = reqwest::Client::builder().build()?;
            let mut http = HttpChatCompletion::with_client(client).with_timeout(config.timeout);
            if let Some(endpoint) = config.endpoint.as_deref() {
                debug!("Routing chat completions to {}", endpoint);
                http = http.with_base_url(endpoint);
            }
            Arc::new(http)
        };

        Ok(Self {
            chat_service,
            config,
        })
    }

    pub fn chat_service(&self) -> Arc<dyn ChatCompletionService> {
        Arc::clone(&self.chat_service)
    }

    pub fn submit_turn_use_case(&self) -> SubmitTurnUseCase {
        SubmitTurnUseCase::new(self.chat_service())
    }

    /// Start a fresh session with the configured selections and no saved
    /// credentials. Keys only enter a session through `/key`.
    pub fn new_session(&self) -> ChatSession {
        let mut session = ChatSession::new();
        session.select_provider(self.config.provider);
        session.select_persona(self.config.persona);

        debug!(
            "Session {} started with {} as the {}",
            session.id(),
            session.provider(),
            session.persona().as_str()
        );
        session
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }
}
