use std::collections::HashMap;
use std::fmt;

use super::Provider;

/// In-memory API keys, one per provider. Never written to disk.
///
/// An absent or empty secret means the provider cannot be used.
#[derive(Clone, Default)]
pub struct CredentialRegistry {
    secrets: HashMap<Provider, String>,
}

impl CredentialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the secret exactly as given. Saving an empty string disables
    /// the provider again.
    pub fn save(&mut self, provider: Provider, secret: impl Into<String>) {
        self.secrets.insert(provider, secret.into());
    }

    pub fn get(&self, provider: Provider) -> Option<&str> {
        self.secrets
            .get(&provider)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn is_usable(&self, provider: Provider) -> bool {
        self.get(provider).is_some()
    }

    pub fn configured(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.is_usable(*p))
            .collect()
    }
}

impl fmt::Debug for CredentialRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: HashMap<&str, &str> = self
            .secrets
            .iter()
            .map(|(p, s)| (p.identifier(), if s.is_empty() { "" } else { "***" }))
            .collect();
        f.debug_struct("CredentialRegistry")
            .field("secrets", &redacted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_is_unusable() {
        let mut registry = CredentialRegistry::new();
        assert!(!registry.is_usable(Provider::OpenAI));

        registry.save(Provider::OpenAI, "");
        assert_eq!(registry.get(Provider::OpenAI), None);

        registry.save(Provider::OpenAI, "sk-test");
        assert_eq!(registry.get(Provider::OpenAI), Some("sk-test"));
        assert!(!registry.is_usable(Provider::DeepSeek));
        assert_eq!(registry.configured(), vec![Provider::OpenAI]);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut registry = CredentialRegistry::new();
        registry.save(Provider::DeepSeek, "sk-very-secret");
        let debug = format!("{:?}", registry);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("DeepSeek"));
    }
}
