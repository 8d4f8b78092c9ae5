//! Fallback orchestration across provider adapters
//!
//! The orchestrator walks a fixed, mode-dependent provider order and returns
//! the first non-empty completion. Providers are never raced: exactly one
//! upstream request is in flight per call.

mod manager;
mod ordering;

#[cfg(test)]
mod tests;

pub use manager::FallbackOrchestrator;
pub use ordering::{CallMode, select_order};
