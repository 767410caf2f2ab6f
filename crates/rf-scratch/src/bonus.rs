//! Bonus (free round) sub-loop
//!
//! ```text
//! Idle ──trigger──> Triggered ──> Running(1..N) ──> Ended
//!   │
//!   └── not triggered: stays Idle
//! ```
//!
//! The trigger is decided once per attempt, right after the base round.
//! Once triggered the rounds always run to completion inside the same
//! attempt.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distribution::DistributionConditions;
use crate::error::ScratchResult;
use crate::events::GameEvent;
use crate::state::TrialState;

/// Bonus lifecycle of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum BonusPhase {
    /// Not triggered
    #[default]
    Idle,
    /// Triggered, rounds not started yet
    Triggered,
    /// Playing round `round` of `total`
    Running { round: u32, total: u32 },
    /// All rounds played
    Ended { bonus_total: f64 },
}

impl BonusPhase {
    /// Check if bonus rounds are in progress
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Decide whether the bonus spot triggers
///
/// `force_wincap` suppresses the trigger and `force_freegame` forces it;
/// neither consumes a random draw.
pub fn decide_trigger<R: Rng + ?Sized>(
    conditions: &DistributionConditions,
    trigger_chance: f64,
    rng: &mut R,
) -> bool {
    if conditions.force_wincap {
        false
    } else if conditions.force_freegame {
        true
    } else {
        rng.random::<f64>() < trigger_chance
    }
}

/// Fixed-length bonus sequence
#[derive(Debug, Clone, Copy)]
pub struct BonusLoop {
    rounds: u32,
}

impl BonusLoop {
    /// Create a loop of `rounds` rounds
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }

    /// Play every round and return the bonus sub-total
    ///
    /// `play_round` generates and evaluates one bonus grid and returns the
    /// round win; it already feeds the state's running total, so the
    /// sub-total is only reported, never added again.
    pub fn run<F>(&self, state: &mut TrialState, mut play_round: F) -> ScratchResult<f64>
    where
        F: FnMut(&mut TrialState) -> ScratchResult<f64>,
    {
        debug_assert_eq!(state.bonus, BonusPhase::Triggered);

        state.events.push(GameEvent::BonusStart {
            round_count: self.rounds,
        });

        let mut bonus_total = 0.0;
        for round in 1..=self.rounds {
            state.bonus = BonusPhase::Running {
                round,
                total: self.rounds,
            };
            state.events.push(GameEvent::BonusRound {
                index: round,
                total: self.rounds,
            });
            bonus_total += play_round(state)?;
        }

        state.bonus = BonusPhase::Ended { bonus_total };
        state.events.push(GameEvent::BonusEnd { bonus_total });
        Ok(bonus_total)
    }
}
