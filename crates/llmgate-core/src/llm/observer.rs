//! Attempt observers
//!
//! Adapters never log to a terminal directly. Each attempt is handed to an
//! [`AttemptObserver`] injected at construction time; the default observer
//! turns it into a structured `tracing` event.

use crate::llm::attempts::CallAttempt;
use parking_lot::Mutex;
use tracing::{info, warn};

/// Sink for per-attempt observability events
pub trait AttemptObserver: Send + Sync {
    fn on_attempt(&self, attempt: &CallAttempt);
}

/// Emits one `tracing` event per attempt
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AttemptObserver for TracingObserver {
    fn on_attempt(&self, attempt: &CallAttempt) {
        if attempt.outcome.is_success() {
            info!(
                provider = %attempt.provider,
                model = %attempt.model_id,
                attempt = attempt.attempt_index,
                outcome = %attempt.outcome,
                latency_ms = attempt.latency_ms,
                "provider attempt succeeded"
            );
        } else {
            warn!(
                provider = %attempt.provider,
                model = %attempt.model_id,
                attempt = attempt.attempt_index,
                outcome = %attempt.outcome,
                latency_ms = attempt.latency_ms,
                "provider attempt failed"
            );
        }
    }
}

/// Keeps every attempt in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<CallAttempt>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All attempts observed so far
    pub fn events(&self) -> Vec<CallAttempt> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl AttemptObserver for RecordingObserver {
    fn on_attempt(&self, attempt: &CallAttempt) {
        self.events.lock().push(attempt.clone());
    }
}
