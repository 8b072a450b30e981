use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Message};

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f64 = 0.7;

/// Static description of one provider's chat-completions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub identifier: &'static str,
    pub display_name: &'static str,
    pub endpoint: &'static str,
    pub model_name: &'static str,
}

const OPENAI: ModelDescriptor = ModelDescriptor {
    identifier: "OpenAI",
    display_name: "OpenAI GPT-3.5 Turbo",
    endpoint: "https://api.openai.com/v1/chat/completions",
    model_name: "gpt-3.5-turbo",
};

const DEEPSEEK: ModelDescriptor = ModelDescriptor {
    identifier: "DeepSeek",
    display_name: "DeepSeek Chat",
    endpoint: "https://api.deepseek.com/v1/chat/completions",
    model_name: "deepseek-chat",
};

/// JSON body of a chat-completions request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'static str,
    pub messages: &'a [Message],
    pub temperature: f64,
}

/// The registered model providers.
///
/// Adding a provider means adding a variant and giving it a descriptor,
/// a header builder and a body builder below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Provider {
    #[default]
    OpenAI,
    DeepSeek,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAI, Provider::DeepSeek];

    pub fn descriptor(&self) -> &'static ModelDescriptor {
        match self {
            Provider::OpenAI => &OPENAI,
            Provider::DeepSeek => &DEEPSEEK,
        }
    }

    pub fn identifier(&self) -> &'static str {
        self.descriptor().identifier
    }

    pub fn endpoint(&self) -> &'static str {
        self.descriptor().endpoint
    }

    pub fn model_name(&self) -> &'static str {
        self.descriptor().model_name
    }

    /// Request headers for this provider, with the credential injected as a
    /// bearer token.
    pub fn request_headers(&self, credential: &str) -> Vec<(&'static str, String)> {
        match self {
            Provider::OpenAI | Provider::DeepSeek => vec![
                ("Authorization", format!("Bearer {}", credential)),
                ("Content-Type", "application/json".to_string()),
            ],
        }
    }

    pub fn request_body<'a>(&self, messages: &'a [Message]) -> ChatCompletionRequest<'a> {
        match self {
            Provider::OpenAI | Provider::DeepSeek => ChatCompletionRequest {
                model: self.model_name(),
                messages,
                temperature: TEMPERATURE,
            },
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Provider::ALL
            .into_iter()
            .find(|p| p.identifier().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = Provider::ALL.iter().map(|p| p.identifier()).collect();
                DomainError::invalid_input(format!(
                    "unknown provider '{}' (expected one of: {})",
                    wanted,
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_descriptors() {
        assert_eq!(Provider::OpenAI.identifier(), "OpenAI");
        assert_eq!(
            Provider::OpenAI.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(Provider::OpenAI.model_name(), "gpt-3.5-turbo");

        assert_eq!(Provider::DeepSeek.identifier(), "DeepSeek");
        assert_eq!(
            Provider::DeepSeek.endpoint(),
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert_eq!(Provider::DeepSeek.model_name(), "deepseek-chat");
    }

    #[test]
    fn test_headers_inject_bearer_token() {
        let headers = Provider::DeepSeek.request_headers("sk-test");
        assert!(headers.contains(&("Authorization", "Bearer sk-test".to_string())));
        assert!(headers.contains(&("Content-Type", "application/json".to_string())));
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![Message::system("be helpful"), Message::user("Hello")];
        let body = serde_json::to_value(Provider::OpenAI.request_body(&messages)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "be helpful"},
                    {"role": "user", "content": "Hello"}
                ],
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("deepseek".parse::<Provider>().unwrap(), Provider::DeepSeek);
        assert_eq!(" OpenAI ".parse::<Provider>().unwrap(), Provider::OpenAI);
        let err = "Grok".parse::<Provider>().unwrap_err();
        assert!(err.to_string().contains("Grok"));
    }
}
