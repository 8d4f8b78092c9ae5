//! Configuration management for llmgate

mod env_loader;
mod model;

pub mod timeouts;

pub use env_loader::{DOTENV_FILES, load_from_env, load_from_lookup};
pub use model::{
    DEFAULT_LOCAL_BASE_URL, DEFAULT_LOCAL_MODEL, DEFAULT_LOCAL_MODEL_FALLBACK,
    DEFAULT_PRIMARY_BASE_URL, DEFAULT_PRIMARY_MODEL, DEFAULT_PROVIDER_PRIORITY,
    DEFAULT_SECONDARY_BASE_URL, DEFAULT_SECONDARY_MODEL, DEFAULT_TERTIARY_BASE_URL,
    DEFAULT_TERTIARY_MODEL, EmulationConfig, GatewayConfig, LocalConfig, PrimaryConfig,
    SecondaryConfig, TertiaryConfig,
};
