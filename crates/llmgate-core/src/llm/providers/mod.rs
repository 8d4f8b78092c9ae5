//! Provider-specific implementations

pub mod error_utils;
pub mod local;
pub mod primary;
pub mod provider_trait;
pub mod request_builder;
pub mod secondary;
pub mod tertiary;

pub(crate) mod transport;

pub use local::LocalChatAdapter;
pub use primary::PrimaryChatAdapter;
pub use provider_trait::{ProviderAdapter, StreamingAdapter, TokenStream};
pub use secondary::SecondaryChatAdapter;
pub use tertiary::TertiaryChatAdapter;

#[cfg(test)]
pub use provider_trait::MockProviderAdapter;
