//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for primary extractor
//! calls. When the remote service fails repeatedly, messages go straight to
//! the deterministic extractor instead of waiting on a dead endpoint.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::scan_config::RecoveryConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

/// Circuit breaker for primary extractor calls
///
/// # State Machine
///
/// - **Closed**: Normal operation, requests pass through
/// - **Open**: Failure threshold exceeded, requests are skipped
/// - **Half-Open**: Reset window elapsed, the next request is let through
///
/// # Configuration
///
/// Uses `RecoveryConfig` for:
/// - `circuit_breaker_threshold`: Failures before opening (default: 5)
/// - `circuit_breaker_reset_secs`: Time before attempting reset (default: 60s)
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    config: RecoveryConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lootscan::scan_config::RecoveryConfig;
    /// use lootscan::circuit_breaker::CircuitBreaker;
    ///
    /// let circuit_breaker = CircuitBreaker::new(RecoveryConfig::default());
    /// assert!(!circuit_breaker.is_open());
    /// ```
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    // A poisoned lock only means another task panicked mid-update; the
    // counters are still meaningful.
    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check if circuit breaker is open (skipping requests)
    ///
    /// Automatically resets to closed once the reset timeout has elapsed.
    pub fn is_open(&self) -> bool {
        let mut state = self.lock();

        if state.failure_count >= self.config.circuit_breaker_threshold {
            if let Some(last_time) = state.last_failure_time {
                if last_time.elapsed() < Duration::from_secs(self.config.circuit_breaker_reset_secs)
                {
                    return true;
                }
                info!("Circuit breaker reset window elapsed, retrying primary extractor");
                *state = BreakerState::default();
            }
        }
        false
    }

    /// Record a failed call
    pub fn record_failure(&self) {
        let mut state = self.lock();
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());
        if state.failure_count == self.config.circuit_breaker_threshold {
            warn!(
                failures = state.failure_count,
                reset_secs = self.config.circuit_breaker_reset_secs,
                "Circuit breaker opened for primary extractor"
            );
        }
    }

    /// Record a successful call, closing the circuit
    pub fn record_success(&self) {
        *self.lock() = BreakerState::default();
    }

    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_after_threshold() {
        let breaker = CircuitBreaker::new(RecoveryConfig {
            circuit_breaker_threshold: 2,
            ..Default::default()
        });

        breaker.record_failure();
        assert!(!breaker.is_open());
        breaker.record_failure();
        assert!(breaker.is_open());
    }

    #[test]
    fn test_success_resets() {
        let breaker = CircuitBreaker::new(RecoveryConfig {
            circuit_breaker_threshold: 1,
            ..Default::default()
        });

        breaker.record_failure();
        assert!(breaker.is_open());
        breaker.record_success();
        assert!(!breaker.is_open());
        assert_eq!(breaker.failure_count(), 0);
    }

    #[test]
    fn test_resets_after_window() {
        let breaker = CircuitBreaker::new(RecoveryConfig {
            circuit_breaker_threshold: 1,
            circuit_breaker_reset_secs: 0,
            ..Default::default()
        });

        breaker.record_failure();
        assert!(!breaker.is_open());
        assert_eq!(breaker.failure_count(), 0);
    }
}
