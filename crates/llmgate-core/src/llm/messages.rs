//! Normalized request and result types

use crate::config::timeouts;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::CallAttempt;
use crate::llm::provider_types::ProviderName;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Message roles in a chat exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single `{role, content}` chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Per-call options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Completion token cap; each adapter applies its own default when unset
    pub max_tokens: Option<u32>,
    /// Local-Chat per-request timeout override
    pub timeout_ms: Option<u64>,
    /// Selects the training ordering
    pub is_training: bool,
    /// Whether Local-Chat may fall through to its fallback model
    pub use_fallback: Option<bool>,
    /// Training-mode local-first switch; unset means the configured default
    pub prefer_local: Option<bool>,
}

/// A normalized "generate text" request
///
/// Constructed once per call site and never mutated by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Create a request with an empty system prompt and default temperature
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: String::new(),
            temperature: Self::DEFAULT_TEMPERATURE,
            options: GenerationOptions::default(),
        }
    }

    /// Set system prompt
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Replace all options
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Select training mode
    pub fn training(mut self) -> Self {
        self.options.is_training = true;
        self
    }

    /// Set the local-first preference for training mode
    pub fn with_prefer_local(mut self, prefer_local: bool) -> Self {
        self.options.prefer_local = Some(prefer_local);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    /// Reject requests no adapter may be invoked with
    pub fn validate(&self) -> GatewayResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(GatewayError::invalid_request_field(
                "prompt must not be empty",
                "prompt",
            ));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(GatewayError::invalid_request_field(
                format!("temperature must be a non-negative number, got {}", self.temperature),
                "temperature",
            ));
        }
        Ok(())
    }

    /// Messages in `[system?, user]` order, as most chat protocols expect
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(ChatMessage::system(&self.system_prompt));
        }
        messages.push(ChatMessage::user(&self.prompt));
        messages
    }

    /// Local-Chat deadline: explicit override, else the mode's profile
    pub fn local_timeout(&self) -> Duration {
        match self.options.timeout_ms {
            Some(ms) => Duration::from_millis(ms),
            None if self.options.is_training => timeouts::local::training_timeout(),
            None => timeouts::local::interactive_timeout(),
        }
    }

    /// Local-Chat token cap: explicit override, else the mode's profile
    pub fn local_max_tokens(&self) -> u32 {
        match self.options.max_tokens {
            Some(max) => max,
            None if self.options.is_training => timeouts::local::TRAINING_MAX_TOKENS,
            None => timeouts::local::INTERACTIVE_MAX_TOKENS,
        }
    }
}

/// The outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Text returned by exactly one provider
    pub content: String,
    /// Provider that produced `content`
    pub provider_used: ProviderName,
    /// Every upstream attempt made for this call, in order
    pub attempts: Vec<CallAttempt>,
    /// True when the provider was not first in the selected order
    pub degraded: bool,
}
