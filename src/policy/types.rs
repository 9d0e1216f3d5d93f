//! Policy types.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Location;

/// Built-in request timeout when neither route nor defaults set one.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Built-in retry attempts (used when the failure mode is `retry`).
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Built-in request body limit (2MB).
pub const DEFAULT_MAX_BODY_BYTES: u64 = 2 * 1024 * 1024;

/// What happens when the protected step fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Let the request through.
    FailOpen,
    /// Reject the request.
    FailClosed,
    /// Retry up to `retry_attempts` times, then reject.
    Retry,
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureMode::FailOpen => "fail_open",
            FailureMode::FailClosed => "fail_closed",
            FailureMode::Retry => "retry",
        };
        f.write_str(name)
    }
}

/// A fully resolved policy applied to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Seconds; fractional values are allowed.
    pub timeout_secs: f64,
    pub failure_mode: FailureMode,
    pub retry_attempts: u32,
    pub max_body_bytes: u64,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            failure_mode: FailureMode::FailClosed,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Policy {
    /// Route timeout expressed in whole milliseconds.
    ///
    /// Out-of-range timeouts (non-positive, NaN) clamp to zero; the validator
    /// rejects them before a simulation normally gets here.
    pub fn timeout_ms(&self) -> u64 {
        let ms = (self.timeout_secs * 1000.0).round();
        if ms.is_nan() || ms <= 0.0 {
            0
        } else {
            // Float-to-int `as` saturates at u64::MAX.
            ms as u64
        }
    }
}

/// A partial policy as declared in config. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyOverride {
    pub timeout_secs: Option<f64>,
    pub failure_mode: Option<FailureMode>,
    pub retry_attempts: Option<u32>,
    pub max_body_bytes: Option<u64>,

    /// Where `timeout_secs` was declared.
    pub timeout_location: Option<Location>,
}

impl PolicyOverride {
    /// Layer `self` over `base`: fields set here win.
    pub fn over(&self, base: &Policy) -> Policy {
        Policy {
            timeout_secs: self.timeout_secs.unwrap_or(base.timeout_secs),
            failure_mode: self.failure_mode.unwrap_or(base.failure_mode),
            retry_attempts: self.retry_attempts.unwrap_or(base.retry_attempts),
            max_body_bytes: self.max_body_bytes.unwrap_or(base.max_body_bytes),
        }
    }
}
