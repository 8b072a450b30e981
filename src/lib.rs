pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{ChatCompletionService, SubmitTurnUseCase, TurnOutcome};

pub use connector::{Container, ContainerConfig, HttpChatCompletion, MockChatCompletion, RecordedCall};

pub use domain::{
    ChatCompletionRequest, ChatSession, CredentialRegistry, DomainError, Message, ModelDescriptor,
    Persona, Provider, Role, Transcript, TurnState,
};
