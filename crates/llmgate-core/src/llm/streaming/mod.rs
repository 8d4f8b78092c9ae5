//! Streaming contract over whole-response providers
//!
//! Callers always receive text through an `on_token(fragment, accumulated)`
//! callback. When the upstream hands back a finished completion the emulator
//! paces it out word by word; an incremental [`StreamingAdapter`] is forwarded
//! as is.
//!
//! [`StreamingAdapter`]: crate::llm::providers::StreamingAdapter

mod emulator;
mod tokens;

pub use emulator::{StreamEmulator, degraded_notice};
pub use tokens::split_tokens;
