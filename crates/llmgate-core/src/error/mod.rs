//! Error types for llmgate
//!
//! Every failure the gateway can surface is a [`GatewayError`]. Variants follow
//! the upstream failure taxonomy: missing credentials, rate limits, timeouts,
//! server errors, empty responses, and the aggregated total failure raised when
//! no provider in the cascade produced text.

mod classifiers;
mod constructors;
mod conversions;
mod types;

pub use types::{GatewayError, GatewayResult};
