//! Per-call attempt bookkeeping, cancellation and deadlines

use crate::error::{GatewayError, GatewayResult};
use crate::llm::observer::{AttemptObserver, TracingObserver};
use crate::llm::provider_types::ProviderName;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Outcome of a single upstream attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Success,
    RateLimited,
    Timeout,
    ServerError,
    EmptyResponse,
    AuthMissing,
    /// Non-retryable non-2xx (including "model not found")
    ClientError,
    /// Connection failure or undecodable body
    TransportError,
    Cancelled,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success)
    }
}

impl std::fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CallOutcome::Success => "success",
            CallOutcome::RateLimited => "rate_limited",
            CallOutcome::Timeout => "timeout",
            CallOutcome::ServerError => "server_error",
            CallOutcome::EmptyResponse => "empty_response",
            CallOutcome::AuthMissing => "auth_missing",
            CallOutcome::ClientError => "client_error",
            CallOutcome::TransportError => "transport_error",
            CallOutcome::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Record of one upstream attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallAttempt {
    pub provider: ProviderName,
    pub model_id: String,
    /// 1-based attempt number within the adapter's model loop
    pub attempt_index: u32,
    pub outcome: CallOutcome,
    pub latency_ms: u64,
    pub started_at: DateTime<Utc>,
}

impl CallAttempt {
    /// Build an attempt record whose latency is measured from `started`
    pub fn finished(
        provider: ProviderName,
        model_id: impl Into<String>,
        attempt_index: u32,
        outcome: CallOutcome,
        started: Instant,
    ) -> Self {
        let elapsed = started.elapsed();
        Self {
            provider,
            model_id: model_id.into(),
            attempt_index,
            outcome,
            latency_ms: elapsed.as_millis() as u64,
            started_at: Utc::now()
                - chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero()),
        }
    }

    /// Build a zero-latency record for an attempt skipped before any I/O
    pub fn skipped(provider: ProviderName, model_id: impl Into<String>, outcome: CallOutcome) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            attempt_index: 1,
            outcome,
            latency_ms: 0,
            started_at: Utc::now(),
        }
    }
}

/// Why a bounded future did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    TimedOut,
    Cancelled,
}

/// State shared by every adapter attempt of one gateway call.
///
/// Carries the caller's cancellation token, the injected observer and the
/// append-only attempt log that ends up on [`GenerationResult`]. Rate-limit
/// waiting is drawn from one budget per call, so a streaming attempt and the
/// fallback resolution that follows it share the same ceiling.
///
/// [`GenerationResult`]: crate::llm::messages::GenerationResult
pub struct CallContext {
    cancel: CancellationToken,
    observer: Arc<dyn AttemptObserver>,
    attempts: Mutex<Vec<CallAttempt>>,
    rate_limit_spent: Mutex<Duration>,
}

impl CallContext {
    /// Create a context bound to a caller token and observer
    pub fn new(cancel: CancellationToken, observer: Arc<dyn AttemptObserver>) -> Self {
        Self {
            cancel,
            observer,
            attempts: Mutex::new(Vec::new()),
            rate_limit_spent: Mutex::new(Duration::ZERO),
        }
    }

    /// Context with a private token and the tracing observer
    pub fn detached() -> Self {
        Self::new(CancellationToken::new(), Arc::new(TracingObserver))
    }

    /// The caller's cancellation token
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail fast when the caller has cancelled
    pub fn ensure_active(&self) -> GatewayResult<()> {
        if self.cancel.is_cancelled() {
            Err(GatewayError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Append an attempt to the log and forward it to the observer
    pub fn record(&self, attempt: CallAttempt) {
        self.observer.on_attempt(&attempt);
        self.attempts.lock().push(attempt);
    }

    /// Snapshot of the attempts recorded so far
    pub fn attempts(&self) -> Vec<CallAttempt> {
        self.attempts.lock().clone()
    }

    /// Drain the attempt log
    pub fn take_attempts(&self) -> Vec<CallAttempt> {
        std::mem::take(&mut *self.attempts.lock())
    }

    /// Number of attempts recorded for `provider`
    pub fn attempt_count(&self, provider: ProviderName) -> usize {
        self.attempts
            .lock()
            .iter()
            .filter(|a| a.provider == provider)
            .count()
    }

    /// Rate-limit waiting still allowed under `ceiling`
    pub fn rate_limit_remaining(&self, ceiling: Duration) -> Duration {
        ceiling.saturating_sub(*self.rate_limit_spent.lock())
    }

    /// Reserve up to `requested` of rate-limit waiting and return the granted wait
    pub fn reserve_rate_limit_wait(&self, requested: Duration, ceiling: Duration) -> Duration {
        let mut spent = self.rate_limit_spent.lock();
        let granted = requested.min(ceiling.saturating_sub(*spent));
        *spent += granted;
        granted
    }

    /// Non-blocking sleep that ends early with `Cancelled` when the caller aborts
    pub async fn sleep(&self, duration: Duration) -> GatewayResult<()> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(GatewayError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Drive `fut` until it completes, the deadline passes, or the caller cancels.
    ///
    /// On timeout or cancellation the future is dropped, which closes the
    /// underlying connection for in-flight HTTP requests.
    pub async fn bounded<F>(&self, deadline: Duration, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            result = tokio::time::timeout(deadline, fut) => result.map_err(|_| Interrupted::TimedOut),
        }
    }
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("attempts", &self.attempts.lock().len())
            .finish()
    }
}
