//! Generation providers behind a single `generate` capability.
//!
//! The rest of the crate only sees [`GenerationGateway`]; request and
//! response shapes stay inside the per-provider modules.

pub mod anthropic;
pub mod gemini;
pub mod models;
pub mod openai;

use crate::error::GenerationError;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

/// Upper bound on a single generation request
const REQUEST_TIMEOUT_SECS: u64 = 300;

static GEMINI_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^AIza\S{26,}$").expect("static pattern should compile"));
static OPENAI_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sk-\S+$").expect("static pattern should compile"));
static ANTHROPIC_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+$").expect("static pattern should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Gemini,
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    /// Human readable provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Google Gemini",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic Claude",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Checks that a key looks like this provider's format.
    ///
    /// Only the shape is checked; the key is never sent anywhere.
    pub fn check_key_format(&self, key: &str) -> Result<(), String> {
        let key = key.trim();
        if key.is_empty() {
            return Err("no API key provided".to_string());
        }
        let (pattern, hint) = match self {
            ProviderKind::Gemini => (&GEMINI_KEY, "Gemini keys start with 'AIza' and are at least 30 characters"),
            ProviderKind::OpenAi => (&OPENAI_KEY, "OpenAI keys start with 'sk-'"),
            ProviderKind::Anthropic => (&ANTHROPIC_KEY, "Anthropic keys contain no whitespace"),
        };
        if pattern.is_match(key) {
            Ok(())
        } else {
            Err(format!("invalid key format: {}", hint))
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API keys per provider
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<String>,
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |key: &Option<String>| if key.is_some() { "set" } else { "unset" };
        f.debug_struct("ApiKeys")
            .field("gemini", &state(&self.gemini))
            .field("openai", &state(&self.openai))
            .field("anthropic", &state(&self.anthropic))
            .finish()
    }
}

impl ApiKeys {
    /// Keys from the provider environment variables
    pub fn from_env() -> Self {
        let read = |provider: ProviderKind| {
            std::env::var(provider.env_var())
                .ok()
                .filter(|key| !key.trim().is_empty())
        };
        Self {
            gemini: read(ProviderKind::Gemini),
            openai: read(ProviderKind::OpenAi),
            anthropic: read(ProviderKind::Anthropic),
        }
    }

    /// Fill keys missing here from `fallback`
    pub fn or(self, fallback: ApiKeys) -> Self {
        Self {
            gemini: self.gemini.or(fallback.gemini),
            openai: self.openai.or(fallback.openai),
            anthropic: self.anthropic.or(fallback.anthropic),
        }
    }

    pub fn get(&self, provider: ProviderKind) -> Option<&str> {
        let key = match provider {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
        };
        key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Providers that have a key
    pub fn available(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|p| self.get(*p).is_some())
            .collect()
    }
}

/// Turns a prompt into free text
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        provider: ProviderKind,
        model: &str,
    ) -> Result<String, GenerationError>;
}

/// Gateway that calls the provider HTTP APIs
pub struct ProviderGateway {
    client: Client,
    keys: ApiKeys,
}

impl ProviderGateway {
    pub fn new(keys: ApiKeys) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, keys })
    }

    /// Warn about keys that do not look right for their provider
    pub fn log_key_warnings(&self) {
        for provider in self.keys.available() {
            if let Some(key) = self.keys.get(provider) {
                if let Err(e) = provider.check_key_format(key) {
                    ::log::warn!("{} key: {}", provider.display_name(), e);
                }
            }
        }
    }
}

#[async_trait]
impl GenerationGateway for ProviderGateway {
    async fn generate(
        &self,
        prompt: &str,
        provider: ProviderKind,
        model: &str,
    ) -> Result<String, GenerationError> {
        let model = model.trim();
        if model.is_empty() {
            return Err(GenerationError::InvalidModel);
        }
        let api_key = self
            .keys
            .get(provider)
            .ok_or(GenerationError::MissingApiKey(provider))?;

        ::log::info!(
            "Requesting generation from {} ({}), prompt is {} bytes",
            provider.display_name(),
            model,
            prompt.len()
        );

        let text = match provider {
            ProviderKind::Gemini => gemini::generate(&self.client, api_key, model, prompt).await?,
            ProviderKind::OpenAi => openai::generate(&self.client, api_key, model, prompt).await?,
            ProviderKind::Anthropic => {
                anthropic::generate(&self.client, api_key, model, prompt).await?
            }
        };

        if text.trim().is_empty() {
            ::log::warn!("{} returned an empty analysis", provider.display_name());
        }
        ::log::debug!("{} returned {} bytes", provider, text.len());
        Ok(text)
    }
}

/// Turn a non-success response into an API error, keeping the provider message
pub(crate) async fn api_error(
    provider: ProviderKind,
    response: reqwest::Response,
) -> GenerationError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);
    GenerationError::Api {
        provider,
        status,
        message,
    }
}
