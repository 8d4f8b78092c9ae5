//! Centralized timeout and pacing constants
//!
//! Values that are not exposed as environment variables live here.

use std::time::Duration;

/// Defaults for the Primary-Chat adapter
pub mod primary {
    use super::*;

    /// Default per-attempt deadline (20 seconds)
    pub const REQUEST_MS: u64 = 20_000;

    /// Default retries after the first attempt
    pub const MAX_RETRIES: u32 = 2;

    /// Linear backoff unit for 5xx and empty responses (2 seconds × attempt)
    pub const SERVER_ERROR_BACKOFF_MS: u64 = 2_000;

    /// Wait applied to a 429 without `Retry-After` (1 minute)
    pub const RATE_LIMIT_WAIT_MS: u64 = 60_000;

    /// Ceiling on total rate-limit waiting within one adapter call (3 minutes)
    pub const RATE_LIMIT_BUDGET_MS: u64 = 180_000;

    /// Completion cap sent when the caller does not set one
    pub const DEFAULT_MAX_TOKENS: u32 = 4_000;

    /// Backoff unit of the streaming variant (200ms × attempt)
    pub const STREAM_BACKOFF_MS: u64 = 200;

    pub fn request_timeout() -> Duration {
        Duration::from_millis(REQUEST_MS)
    }
}

/// Shared HTTP client settings
pub mod http {
    use super::*;

    /// TCP connect deadline applied by the shared client (10 seconds)
    pub const CONNECT_SECS: u64 = 10;

    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_SECS)
    }
}

/// Defaults for the single-shot hosted probes (Secondary / Tertiary)
pub mod probe {
    use super::*;

    /// Per-request deadline (30 seconds)
    pub const REQUEST_SECS: u64 = 30;

    pub fn request_timeout() -> Duration {
        Duration::from_secs(REQUEST_SECS)
    }
}

/// Defaults for the Local-Chat adapter
pub mod local {
    use super::*;

    /// Availability probe deadline (2 seconds)
    pub const AVAILABILITY_PROBE_MS: u64 = 2_000;

    /// Interactive profile
    pub const INTERACTIVE_TIMEOUT_SECS: u64 = 60;
    pub const INTERACTIVE_MAX_TOKENS: u32 = 500;

    /// Training profile
    pub const TRAINING_TIMEOUT_SECS: u64 = 45;
    pub const TRAINING_MAX_TOKENS: u32 = 400;

    /// Context window requested from the local host
    pub const CONTEXT_WINDOW: u32 = 4_096;

    pub fn availability_probe_timeout() -> Duration {
        Duration::from_millis(AVAILABILITY_PROBE_MS)
    }

    pub fn interactive_timeout() -> Duration {
        Duration::from_secs(INTERACTIVE_TIMEOUT_SECS)
    }

    pub fn training_timeout() -> Duration {
        Duration::from_secs(TRAINING_TIMEOUT_SECS)
    }
}

/// Pacing of emulated token emission
pub mod emulation {
    use super::*;

    pub const MIN_DELAY_MS: u64 = 30;
    pub const MAX_DELAY_MS: u64 = 100;

    pub fn min_delay() -> Duration {
        Duration::from_millis(MIN_DELAY_MS)
    }

    pub fn max_delay() -> Duration {
        Duration::from_millis(MAX_DELAY_MS)
    }
}
