//! Circuit breaker guarding the completion endpoint

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,   // Normal operation
    Open,     // Failing, skip the upstream
    HalfOpen, // One trial call reaches the upstream
}

#[derive(Debug)]
struct BreakerEntry {
    state: BreakerState,
    failure_count: usize,
    opened_at: Option<Instant>,
    trial_started: Option<Instant>,
}

impl BreakerEntry {
    fn new() -> Self {
        Self {
            state: BreakerState::Closed,
            failure_count: 0,
            opened_at: None,
            trial_started: None,
        }
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: usize,
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

/// Tracks consecutive upstream failures.
///
/// A threshold of zero disables the breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    entry: Mutex<BreakerEntry>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            entry: Mutex::new(BreakerEntry::new()),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerEntry> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether calls should currently be skipped.
    ///
    /// Once the reset timeout has passed exactly one caller is let through as
    /// the half-open trial call. One that never reports back is replaced after
    /// another reset timeout.
    pub fn is_open(&self) -> bool {
        if self.config.failure_threshold == 0 {
            return false;
        }

        let mut entry = self.lock();
        let now = Instant::now();
        match entry.state {
            BreakerState::Closed => false,
            BreakerState::Open => match entry.opened_at {
                Some(opened_at) if now.duration_since(opened_at) >= self.config.reset_timeout => {
                    entry.state = BreakerState::HalfOpen;
                    entry.trial_started = Some(now);
                    false
                }
                _ => true,
            },
            BreakerState::HalfOpen => match entry.trial_started {
                Some(started) if now.duration_since(started) < self.config.reset_timeout => true,
                _ => {
                    entry.trial_started = Some(now);
                    false
                }
            },
        }
    }

    pub fn mark_success(&self) {
        let mut entry = self.lock();
        *entry = BreakerEntry::new();
    }

    pub fn mark_failure(&self) {
        if self.config.failure_threshold == 0 {
            return;
        }

        let mut entry = self.lock();
        entry.failure_count += 1;

        // A failed trial call reopens immediately
        if entry.state == BreakerState::HalfOpen
            || entry.failure_count >= self.config.failure_threshold
        {
            entry.state = BreakerState::Open;
            entry.opened_at = Some(Instant::now());
            entry.trial_started = None;
        }
    }

    pub fn state(&self) -> BreakerState {
        self.lock().state
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}
