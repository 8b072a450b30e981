use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ChatCompletionService;
use crate::domain::{DomainError, Message, Provider};

/// No deadline: an unresponsive provider blocks the turn until it answers.
pub const DEFAULT_REQUEST_TIMEOUT: Option<Duration> = None;

/// Minimal subset of the chat-completions response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible chat-completions endpoints.
///
/// Headers and body come from the [`Provider`] descriptor; this type only
/// owns transport. Every call is a single POST with no retries.
///
/// The request deadline is injectable and defaults to
/// [`DEFAULT_REQUEST_TIMEOUT`] (none). A base URL override replaces the
/// scheme and host of every provider endpoint while keeping its path, which
/// lets the client target local OpenAI-compatible servers:
///
/// ```text
/// https://api.openai.com/v1/chat/completions
///   with base http://localhost:1234
///   -> http://localhost:1234/v1/chat/completions
/// ```
pub struct HttpChatCompletion {
    client: reqwest::Client,
    timeout: Option<Duration>,
    base_url: Option<String>,
}

impl HttpChatCompletion {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            base_url: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolve the URL a request for `provider` is sent to.
    pub fn endpoint_for(&self, provider: Provider) -> Result<String, DomainError> {
        let endpoint = provider.endpoint();
        let Some(base) = self.base_url.as_deref() else {
            return Ok(endpoint.to_string());
        };

        let url = reqwest::Url::parse(endpoint).map_err(|e| {
            DomainError::invalid_input(format!("invalid endpoint for {}: {}", provider, e))
        })?;
        Ok(format!("{}{}", base.trim_end_matches('/'), url.path()))
    }

    fn extract_content(body: &str) -> Result<String, DomainError> {
        let api_response: ApiResponse =
            serde_json::from_str(body).map_err(|e| DomainError::parse(e.to_string()))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| DomainError::parse("response contained no message content"))
    }
}

impl Default for HttpChatCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatCompletionService for HttpChatCompletion {
    async fn complete(
        &self,
        provider: Provider,
        credential: &str,
        messages: &[Message],
    ) -> Result<String, DomainError> {
        let url = self.endpoint_for(provider)?;
        let body = serde_json::to_vec(&provider.request_body(messages))
            .map_err(|e| DomainError::parse(e.to_string()))?;

        let mut request = self.client.post(&url).body(body);
        for (name, value) in provider.request_headers(credential) {
            request = request.header(name, value);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!("POST {} ({} messages)", url, messages.len());

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::transport(e.to_string()))?;

        if status != StatusCode::OK {
            warn!("{} returned {}", provider, status);
            return Err(DomainError::provider(status.as_u16(), text));
        }

        Self::extract_content(&text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_content_reads_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"Hi there"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(HttpChatCompletion::extract_content(body).unwrap(), "Hi there");
    }

    #[test]
    fn extract_content_rejects_malformed_json() {
        let err = HttpChatCompletion::extract_content("not json").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn extract_content_rejects_empty_choices() {
        let err = HttpChatCompletion::extract_content(r#"{"choices":[]}"#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn endpoint_defaults_to_descriptor() {
        let client = HttpChatCompletion::new();
        assert_eq!(
            client.endpoint_for(Provider::DeepSeek).unwrap(),
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert_eq!(client.timeout(), None);
    }

    #[test]
    fn base_url_override_keeps_path() {
        let client = HttpChatCompletion::new().with_base_url("http://localhost:1234/");
        assert_eq!(
            client.endpoint_for(Provider::OpenAI).unwrap(),
            "http://localhost:1234/v1/chat/completions"
        );
    }
}
