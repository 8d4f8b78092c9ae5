//! Shared fixtures for the wiremock-backed gateway tests

#![allow(dead_code)]

use llmgate_core::{EmulationConfig, GatewayConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const PRIMARY_KEY: &str = "test-primary-key";
pub const SECONDARY_KEY: &str = "test-secondary-key";
pub const TERTIARY_KEY: &str = "test-tertiary-key";

/// Configuration with every provider disabled and fast pacing
pub fn quiet_config() -> GatewayConfig {
    let mut config = GatewayConfig::new();
    config.emulation = EmulationConfig::immediate();
    config
}

/// Primary-Chat pointed at `server` with millisecond backoffs
pub fn with_primary(mut config: GatewayConfig, server: &MockServer) -> GatewayConfig {
    config.primary.api_key = Some(PRIMARY_KEY.to_string());
    config.primary.base_url = server.uri();
    config.primary.backoff_ms = 10;
    config.primary.stream_backoff_ms = 10;
    config.primary.rate_limit_wait_ms = 50;
    config
}

pub fn with_secondary(mut config: GatewayConfig, base_url: impl Into<String>) -> GatewayConfig {
    config.secondary.api_key = Some(SECONDARY_KEY.to_string());
    config.secondary.base_url = base_url.into();
    config
}

pub fn with_local(mut config: GatewayConfig, server: &MockServer) -> GatewayConfig {
    config.local.enabled = true;
    config.local.base_url = server.uri();
    config
}

pub fn with_tertiary(mut config: GatewayConfig, base_url: impl Into<String>) -> GatewayConfig {
    config.tertiary.api_key = Some(TERTIARY_KEY.to_string());
    config.tertiary.base_url = base_url.into();
    config
}

/// OpenAI-compatible chat completion body
pub fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "grok-beta",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 9, "completion_tokens": 1, "total_tokens": 10 }
    })
}

/// `generateContent` body
pub fn generate_content(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// Local `/api/chat` body
pub fn local_chat(content: &str) -> Value {
    json!({
        "model": "gemma3:1b",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

/// A base URL nothing listens on
pub fn unreachable_base_url() -> String {
    "http://127.0.0.1:1".to_string()
}
