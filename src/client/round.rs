//! # RegistrationRound: one batch of concurrent registration attempts.
//!
//! A round owns one cancellable attempt task per candidate master and exactly
//! one retry-timer task. At most one round is live; starting a new round (or
//! winning registration) cancels the previous round wholesale, so stale
//! completions can only observe the world through the shared `registered`
//! flag, which they must check before acting.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handles for one live round.
pub(crate) struct RegistrationRound {
    round: u32,
    cancel: CancellationToken,
    attempts: Vec<JoinHandle<()>>,
    timer: JoinHandle<()>,
}

impl RegistrationRound {
    pub(crate) fn new(
        round: u32,
        cancel: CancellationToken,
        attempts: Vec<JoinHandle<()>>,
        timer: JoinHandle<()>,
    ) -> Self {
        Self {
            round,
            cancel,
            attempts,
            timer,
        }
    }

    /// Attempt counter, 1-based.
    pub(crate) fn round(&self) -> u32 {
        self.round
    }

    /// Cancels the attempt tasks and the retry timer.
    ///
    /// Cooperative first (the token), forceful second (abort), so an attempt
    /// blocked in resolution is interrupted rather than leaked. Aborting the
    /// already-fired timer is a no-op.
    pub(crate) fn cancel(self) {
        self.cancel.cancel();
        for attempt in self.attempts {
            attempt.abort();
        }
        self.timer.abort();
    }
}
