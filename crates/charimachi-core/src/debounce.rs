//! Keyword debouncing.
//!
//! The debouncer does not own a clock. Every input yields a [`TimerRequest`]
//! that the caller arms; when the timer elapses the caller hands the ticket
//! back through [`SearchDebouncer::fire`]. Only the ticket of the most recent
//! input commits a value, so earlier timers are cancelled even if the host
//! fails to abort them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default quiet period before a keyword is committed.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerTicket(pub u64);

/// Instruction to arm a one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub ticket: TimerTicket,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet_period: Duration,
    issued: u64,
    pending: Option<(TimerTicket, String)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl SearchDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            issued: 0,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record a keystroke, superseding any pending value.
    pub fn input(&mut self, keyword: impl Into<String>) -> TimerRequest {
        self.issued += 1;
        let ticket = TimerTicket(self.issued);
        self.pending = Some((ticket, keyword.into()));
        TimerRequest {
            ticket,
            delay: self.quiet_period,
        }
    }

    /// Commit the pending value if `ticket` belongs to the latest input.
    pub fn fire(&mut self, ticket: TimerTicket) -> Option<String> {
        let is_latest = matches!(&self.pending, Some((latest, _)) if *latest == ticket);
        if !is_latest {
            return None;
        }
        self.pending.take().map(|(_, value)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
