//! Trial observation hooks
//!
//! Observers only watch: nothing they do feeds back into the retry loop.

use crate::book::TrialBook;
use crate::distribution::WinCriteria;

/// Attempts between progress checkpoints
pub const CHECKPOINT_INTERVAL: u32 = 100;

/// Check if an attempt number is a progress checkpoint
///
/// The first hundred attempts are quiet; after that every hundredth
/// attempt is reported.
pub fn is_checkpoint(attempt: u32) -> bool {
    attempt > CHECKPOINT_INTERVAL && attempt % CHECKPOINT_INTERVAL == 0
}

/// Snapshot of a trial that is still retrying
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptCheckpoint<'a> {
    pub sim_id: u64,
    pub bet_mode: &'a str,
    pub criteria: &'a str,
    pub attempt: u32,
    /// Win of the attempt just played
    pub win: f64,
    pub win_criteria: WinCriteria,
}

/// Observer of trial progress
pub trait TrialObserver: Send + Sync {
    /// A checkpoint attempt was rejected or accepted
    fn on_attempt_checkpoint(&self, _checkpoint: &AttemptCheckpoint<'_>) {}

    /// The retry budget ran out; the attempt will be finalized as forced
    fn on_budget_exhausted(&self, _checkpoint: &AttemptCheckpoint<'_>) {}

    /// A book was produced
    fn on_trial_finalized(&self, _book: &TrialBook) {}
}

/// Observer writing through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl TrialObserver for LogObserver {
    fn on_attempt_checkpoint(&self, checkpoint: &AttemptCheckpoint<'_>) {
        log::debug!(
            "sim {} [{}/{}]: attempt {} (win {:.2}, criteria {:?})",
            checkpoint.sim_id,
            checkpoint.bet_mode,
            checkpoint.criteria,
            checkpoint.attempt,
            checkpoint.win,
            checkpoint.win_criteria
        );
    }

    fn on_budget_exhausted(&self, checkpoint: &AttemptCheckpoint<'_>) {
        log::warn!(
            "sim {} [{}/{}]: retry budget exhausted after {} attempts, forcing win {:.2}",
            checkpoint.sim_id,
            checkpoint.bet_mode,
            checkpoint.criteria,
            checkpoint.attempt,
            checkpoint.win
        );
    }

    fn on_trial_finalized(&self, book: &TrialBook) {
        log::debug!(
            "sim {} [{}/{}]: finalized win {:.2} after {} attempts",
            book.id,
            book.bet_mode,
            book.criteria,
            book.final_win,
            book.attempts
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoints() {
        assert!(!is_checkpoint(1));
        assert!(!is_checkpoint(100));
        assert!(!is_checkpoint(150));
        assert!(is_checkpoint(200));
        assert!(is_checkpoint(10_000));
    }
}
