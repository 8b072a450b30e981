use thiserror::Error;

/// Errors surfaced by the chat core.
///
/// The `Display` text of each variant is what the front end shows the user
/// in place of an assistant reply. Provider errors render as the raw
/// response body, transport and parse errors as the underlying error text.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Please save your {provider} API key before sending a message")]
    MissingCredential { provider: String },

    #[error("{body}")]
    ProviderError { status: u16, body: String },

    #[error("{0}")]
    TransportError(String),

    #[error("{0}")]
    ParseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DomainError {
    pub fn missing_credential(provider: impl Into<String>) -> Self {
        Self::MissingCredential {
            provider: provider.into(),
        }
    }

    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self::ProviderError {
            status,
            body: body.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential { .. })
    }

    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::ProviderError { .. })
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }

    /// HTTP status reported by the provider, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ProviderError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
