//! Gateway configuration model
//!
//! The whole configuration is read once at startup and never mutated. Each
//! adapter receives its own section by value at construction time.

use crate::config::timeouts;
use crate::llm::provider_types::ProviderName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_PRIMARY_MODEL: &str = "grok-beta";
pub const DEFAULT_PRIMARY_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_SECONDARY_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_SECONDARY_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_LOCAL_MODEL: &str = "gemma3:1b";
pub const DEFAULT_LOCAL_MODEL_FALLBACK: &str = "qwen3:4b";
pub const DEFAULT_TERTIARY_MODEL: &str = "meta-llama/Llama-3-8b-chat-hf";
pub const DEFAULT_TERTIARY_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_PROVIDER_PRIORITY: &str = "primary,secondary,local";

/// Primary-Chat section
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryConfig {
    pub api_key: Option<String>,
    /// Acceptable model identifiers, tried in order
    pub models: Vec<String>,
    pub base_url: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    /// Linear backoff unit for 5xx / empty responses
    pub backoff_ms: u64,
    /// Wait used when a 429 carries no `Retry-After`
    pub rate_limit_wait_ms: u64,
    /// Ceiling on total rate-limit waiting in one adapter call
    pub rate_limit_budget_ms: u64,
    /// Backoff unit of the streaming variant
    pub stream_backoff_ms: u64,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: vec![DEFAULT_PRIMARY_MODEL.to_string()],
            base_url: DEFAULT_PRIMARY_BASE_URL.to_string(),
            timeout_ms: timeouts::primary::REQUEST_MS,
            max_retries: timeouts::primary::MAX_RETRIES,
            backoff_ms: timeouts::primary::SERVER_ERROR_BACKOFF_MS,
            rate_limit_wait_ms: timeouts::primary::RATE_LIMIT_WAIT_MS,
            rate_limit_budget_ms: timeouts::primary::RATE_LIMIT_BUDGET_MS,
            stream_backoff_ms: timeouts::primary::STREAM_BACKOFF_MS,
        }
    }
}

impl PrimaryConfig {
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Secondary-Chat section
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_SECONDARY_MODEL.to_string(),
            base_url: DEFAULT_SECONDARY_BASE_URL.to_string(),
        }
    }
}

impl fmt::Debug for PrimaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimaryConfig")
            .field("api_key", &mask_key(self.api_key.as_deref()))
            .field("models", &self.models)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("backoff_ms", &self.backoff_ms)
            .field("rate_limit_wait_ms", &self.rate_limit_wait_ms)
            .field("rate_limit_budget_ms", &self.rate_limit_budget_ms)
            .field("stream_backoff_ms", &self.stream_backoff_ms)
            .finish()
    }
}

impl SecondaryConfig {
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for SecondaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecondaryConfig")
            .field("api_key", &mask_key(self.api_key.as_deref()))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Local-Chat section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub fallback_model: Option<String>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: DEFAULT_LOCAL_BASE_URL.to_string(),
            model: DEFAULT_LOCAL_MODEL.to_string(),
            fallback_model: Some(DEFAULT_LOCAL_MODEL_FALLBACK.to_string()),
        }
    }
}

/// Tertiary-Chat section
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TertiaryConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for TertiaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_TERTIARY_MODEL.to_string(),
            base_url: DEFAULT_TERTIARY_BASE_URL.to_string(),
        }
    }
}

impl TertiaryConfig {
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for TertiaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TertiaryConfig")
            .field("api_key", &mask_key(self.api_key.as_deref()))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Pacing of emulated streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulationConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for EmulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: timeouts::emulation::MIN_DELAY_MS,
            max_delay_ms: timeouts::emulation::MAX_DELAY_MS,
        }
    }
}

impl EmulationConfig {
    /// No pacing; fragments are emitted back to back
    pub fn immediate() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }
}

/// Process-wide gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub primary: PrimaryConfig,
    pub secondary: SecondaryConfig,
    pub local: LocalConfig,
    pub tertiary: TertiaryConfig,
    /// Raw `PROVIDER_PRIORITY` value. Kept for display only: the orchestrator
    /// ordering is fixed and never consults it.
    pub provider_priority: String,
    /// Default for `prefer_local` in training mode
    pub prefer_local_for_training: bool,
    pub emulation: EmulationConfig,
}

impl GatewayConfig {
    /// Configuration with every hosted provider disabled and local off
    pub fn new() -> Self {
        Self {
            provider_priority: DEFAULT_PROVIDER_PRIORITY.to_string(),
            prefer_local_for_training: true,
            ..Default::default()
        }
    }

    /// Whether the provider has what it needs to make a network call
    pub fn is_enabled(&self, provider: ProviderName) -> bool {
        match provider {
            ProviderName::Primary => self.primary.enabled(),
            ProviderName::Secondary => self.secondary.enabled(),
            ProviderName::Local => self.local.enabled,
            ProviderName::Tertiary => self.tertiary.enabled(),
        }
    }

    /// `PROVIDER_PRIORITY` split into known provider names, unknown entries dropped
    pub fn parsed_priority(&self) -> Vec<ProviderName> {
        self.provider_priority
            .split(',')
            .filter_map(|entry| entry.parse().ok())
            .collect()
    }

    /// Human-readable summary with secrets masked
    pub fn redacted_summary(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "primary:   enabled={} key={} models={} base_url={} timeout_ms={} max_retries={}",
            self.primary.enabled(),
            mask_key(self.primary.api_key.as_deref()),
            self.primary.models.join(","),
            self.primary.base_url,
            self.primary.timeout_ms,
            self.primary.max_retries
        ));
        lines.push(format!(
            "secondary: enabled={} key={} model={} base_url={}",
            self.secondary.enabled(),
            mask_key(self.secondary.api_key.as_deref()),
            self.secondary.model,
            self.secondary.base_url
        ));
        lines.push(format!(
            "local:     enabled={} base_url={} model={} fallback={}",
            self.local.enabled,
            self.local.base_url,
            self.local.model,
            self.local.fallback_model.as_deref().unwrap_or("-")
        ));
        lines.push(format!(
            "tertiary:  enabled={} key={} model={} base_url={}",
            self.tertiary.enabled(),
            mask_key(self.tertiary.api_key.as_deref()),
            self.tertiary.model,
            self.tertiary.base_url
        ));
        lines.push(format!(
            "provider_priority={} (not consulted)",
            self.provider_priority
        ));
        lines.push(format!(
            "prefer_local_for_training={}",
            self.prefer_local_for_training
        ));
        lines.join("\n")
    }
}

/// Mask an API key for display, keeping only the last four characters
fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "<unset>".to_string(),
        Some(k) if k.chars().count() <= 4 => "****".to_string(),
        Some(k) => {
            let tail: String = k.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            format!("****{}", tail)
        }
    }
}
