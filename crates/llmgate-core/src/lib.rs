//! llmgate core library
//!
//! A multi-provider text-generation gateway. A normalized
//! [`GenerationRequest`] is resolved against a fixed, mode-dependent cascade of
//! upstream chat providers with bounded retries, rate-limit-aware backoff and
//! cancellable deadlines. [`Gateway::generate_streaming`] exposes the same
//! resolution through a token callback, emulating incremental output for
//! providers that only return whole responses.

pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;

pub use config::{EmulationConfig, GatewayConfig, load_from_env, load_from_lookup};
pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use llm::{
    AttemptObserver, CallAttempt, CallContext, CallMode, CallOutcome, FallbackOrchestrator,
    GenerationOptions, GenerationRequest, GenerationResult, ProviderAdapter, ProviderDescriptor,
    ProviderName, RecordingObserver, StreamingAdapter, TracingObserver,
};

pub use tokio_util::sync::CancellationToken;
