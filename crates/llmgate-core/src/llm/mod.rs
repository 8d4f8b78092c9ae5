//! Provider adapters, fallback orchestration and streaming

pub mod attempts;
pub mod messages;
pub mod observer;
pub mod orchestrator;
pub mod provider_types;
pub mod providers;
pub mod streaming;

pub use attempts::{CallAttempt, CallContext, CallOutcome, Interrupted};
pub use messages::{ChatMessage, GenerationOptions, GenerationRequest, GenerationResult, MessageRole};
pub use observer::{AttemptObserver, RecordingObserver, TracingObserver};
pub use orchestrator::{CallMode, FallbackOrchestrator, select_order};
pub use provider_types::{ProviderDescriptor, ProviderName};
pub use providers::{
    LocalChatAdapter, PrimaryChatAdapter, ProviderAdapter, SecondaryChatAdapter, StreamingAdapter,
    TertiaryChatAdapter, TokenStream,
};
pub use streaming::{StreamEmulator, degraded_notice, split_tokens};
