//! Provider identities and descriptors

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The four upstream providers the gateway knows how to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    /// Full-featured hosted chat API (OpenAI-compatible), hard-fail with retries
    Primary,
    /// Hosted `generateContent` API, single-shot soft-fail probe
    Secondary,
    /// Local inference host (`/api/chat`), dual-model soft-fail
    Local,
    /// Hosted OpenAI-compatible API, single-shot soft-fail probe
    Tertiary,
}

impl ProviderName {
    /// All providers in declaration order
    pub const ALL: [ProviderName; 4] = [
        ProviderName::Primary,
        ProviderName::Secondary,
        ProviderName::Local,
        ProviderName::Tertiary,
    ];

    /// Lowercase name used in logs and configuration
    pub fn name(&self) -> &'static str {
        match self {
            ProviderName::Primary => "primary",
            ProviderName::Secondary => "secondary",
            ProviderName::Local => "local",
            ProviderName::Tertiary => "tertiary",
        }
    }
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "primary" => Ok(ProviderName::Primary),
            "secondary" => Ok(ProviderName::Secondary),
            "local" => Ok(ProviderName::Local),
            "tertiary" => Ok(ProviderName::Tertiary),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Static description of an adapter as registered at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Which provider this adapter talks to
    pub name: ProviderName,
    /// Derived from presence of credentials or the local-service switch
    pub enabled: bool,
    /// Position within the interactive order (lower = earlier)
    pub priority: u32,
    /// Per-attempt deadline
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Soft-fail adapters never raise; failure is empty content
    pub soft_fail: bool,
}

impl ProviderDescriptor {
    /// Create a descriptor with single-shot, soft-fail defaults
    pub fn new(name: ProviderName) -> Self {
        Self {
            name,
            enabled: false,
            priority: 0,
            timeout: Duration::from_secs(30),
            max_retries: 0,
            soft_fail: true,
        }
    }

    /// Set enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Set per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Mark the adapter as hard-fail
    pub fn hard_fail(mut self) -> Self {
        self.soft_fail = false;
        self
    }

    /// Total attempts the adapter may make per model
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_round_trip() {
        for provider in ProviderName::ALL {
            let parsed: ProviderName = provider.to_string().parse().unwrap();
            assert_eq!(parsed, provider);
        }
        assert!("openai".parse::<ProviderName>().is_err());
        assert_eq!(" Local ".parse::<ProviderName>(), Ok(ProviderName::Local));
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = ProviderDescriptor::new(ProviderName::Primary)
            .with_enabled(true)
            .with_priority(0)
            .with_timeout(Duration::from_millis(20_000))
            .with_max_retries(2)
            .hard_fail();

        assert!(descriptor.enabled);
        assert!(!descriptor.soft_fail);
        assert_eq!(descriptor.max_attempts(), 3);
        assert_eq!(descriptor.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = ProviderDescriptor::new(ProviderName::Tertiary);
        assert!(!descriptor.enabled);
        assert!(descriptor.soft_fail);
        assert_eq!(descriptor.max_attempts(), 1);
    }
}
