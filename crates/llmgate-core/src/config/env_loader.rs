//! Environment variable-based configuration loading

use crate::config::model::{DEFAULT_PROVIDER_PRIORITY, GatewayConfig};
use crate::error::{GatewayError, GatewayResult};
use std::path::Path;
use tracing::debug;

/// Dotenv files read before the process environment, highest precedence first
pub const DOTENV_FILES: [&str; 2] = ["env.local", ".env"];

/// Load configuration from the process environment.
///
/// `env.local` and then `.env` in the current directory are loaded first when
/// present. Variables already set in the process are never overwritten, so the
/// real environment wins over both files and `env.local` wins over `.env`.
pub fn load_from_env() -> GatewayResult<GatewayConfig> {
    for file in DOTENV_FILES {
        if Path::new(file).exists() {
            dotenvy::from_filename(file)?;
            debug!(file, "loaded dotenv file");
        }
    }

    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary key lookup
pub fn load_from_lookup<F>(lookup: F) -> GatewayResult<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let mut config = GatewayConfig::new();

    // Primary
    config.primary.api_key = get("PRIMARY_API_KEY");
    if let Some(model) = get("PRIMARY_MODEL") {
        config.primary.models = model
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
    }
    if let Some(url) = get("PRIMARY_BASE_URL") {
        config.primary.base_url = url;
    }
    if let Some(v) = get("PRIMARY_TIMEOUT_MS") {
        config.primary.timeout_ms = parse_number("PRIMARY_TIMEOUT_MS", &v)?;
    }
    if let Some(v) = get("PRIMARY_MAX_RETRIES") {
        config.primary.max_retries = parse_number("PRIMARY_MAX_RETRIES", &v)?;
    }
    if let Some(v) = get("PRIMARY_BACKOFF_MS") {
        config.primary.backoff_ms = parse_number("PRIMARY_BACKOFF_MS", &v)?;
    }
    if let Some(v) = get("PRIMARY_RATE_LIMIT_WAIT_MS") {
        config.primary.rate_limit_wait_ms = parse_number("PRIMARY_RATE_LIMIT_WAIT_MS", &v)?;
    }
    if let Some(v) = get("PRIMARY_RATE_LIMIT_BUDGET_MS") {
        config.primary.rate_limit_budget_ms = parse_number("PRIMARY_RATE_LIMIT_BUDGET_MS", &v)?;
    }

    // Secondary
    config.secondary.api_key = get("SECONDARY_API_KEY");
    if let Some(model) = get("SECONDARY_MODEL") {
        config.secondary.model = model;
    }
    if let Some(url) = get("SECONDARY_BASE_URL") {
        config.secondary.base_url = url;
    }

    // Local
    if let Some(v) = get("LOCAL_ENABLED") {
        config.local.enabled = parse_bool("LOCAL_ENABLED", &v)?;
    }
    if let Some(url) = get("LOCAL_BASE_URL") {
        config.local.base_url = url;
    }
    if let Some(model) = get("LOCAL_MODEL") {
        config.local.model = model;
    }
    if let Some(model) = get("LOCAL_MODEL_FALLBACK") {
        config.local.fallback_model = Some(model);
    }

    // Tertiary
    config.tertiary.api_key = get("TERTIARY_API_KEY");
    if let Some(model) = get("TERTIARY_MODEL") {
        config.tertiary.model = model;
    }
    if let Some(url) = get("TERTIARY_BASE_URL") {
        config.tertiary.base_url = url;
    }

    // Ordering
    config.provider_priority =
        get("PROVIDER_PRIORITY").unwrap_or_else(|| DEFAULT_PROVIDER_PRIORITY.to_string());
    if let Some(v) = get("PREFER_LOCAL_FOR_TRAINING") {
        config.prefer_local_for_training = parse_bool("PREFER_LOCAL_FOR_TRAINING", &v)?;
    }

    if config.primary.models.is_empty() {
        return Err(GatewayError::config_with_context(
            "PRIMARY_MODEL must name at least one model",
            "Parsing PRIMARY_MODEL",
        ));
    }

    Ok(config)
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> GatewayResult<T> {
    value.parse().map_err(|_| {
        GatewayError::config_with_context(
            format!("Invalid {} value", key),
            format!("Parsing '{}' as a non-negative integer", value),
        )
    })
}

fn parse_bool(key: &str, value: &str) -> GatewayResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(GatewayError::config_with_context(
            format!("Invalid {} value", key),
            format!("Parsing '{}' as a boolean", value),
        )),
    }
}
