use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    OpenAi, // Primary commercial provider
    Gemini, // Free-tier secondary
    Groq,   // Tertiary
}

impl ProviderName {
    /// Only the commercial primary is allowed to trigger the fallback chain.
    pub fn is_commercial(&self) -> bool {
        matches!(self, ProviderName::OpenAi)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::OpenAi => "openai",
            ProviderName::Gemini => "gemini",
            ProviderName::Groq => "groq",
        }
    }
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct AIProviderConfig {
    pub name: ProviderName,
    pub model: String,
    pub api_key: SecretString,
}

impl AIProviderConfig {
    pub fn new(name: ProviderName, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name,
            model: model.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}

/// Provider configuration for a single generation request.
#[derive(Clone, Debug)]
pub struct ProviderConfigs {
    pub primary: AIProviderConfig,
    pub secondary: Option<AIProviderConfig>,
    pub tertiary: Option<AIProviderConfig>,
}

impl ProviderConfigs {
    pub fn new(primary: AIProviderConfig) -> Self {
        Self {
            primary,
            secondary: None,
            tertiary: None,
        }
    }

    pub fn with_secondary(mut self, config: AIProviderConfig) -> Self {
        self.secondary = Some(config);
        self
    }

    pub fn with_tertiary(mut self, config: AIProviderConfig) -> Self {
        self.tertiary = Some(config);
        self
    }

    /// Fallbacks in the order they are tried, skipping blank credentials.
    pub fn fallback_candidates(&self) -> Vec<&AIProviderConfig> {
        [self.secondary.as_ref(), self.tertiary.as_ref()]
            .into_iter()
            .flatten()
            .filter(|config| config.has_credential())
            .collect()
    }
}
