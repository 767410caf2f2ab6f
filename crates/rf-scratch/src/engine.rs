//! Scratch Engine: constrained-outcome trial controller
//!
//! Every trial targets one distribution of a bet mode. An attempt plays the
//! base round and, when triggered, the bonus rounds; the attempt is then
//! checked against the distribution's win criterion. Rejected attempts are
//! discarded and replayed from scratch until one is accepted or the retry
//! budget runs out, in which case the last attempt is kept and flagged.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bonus::{BonusLoop, decide_trigger};
use crate::book::TrialBook;
use crate::config::GameConfig;
use crate::distribution::{BetMode, Distribution, DistributionConditions};
use crate::error::ScratchResult;
use crate::events::GameEvent;
use crate::grid::Grid;
use crate::observer::{AttemptCheckpoint, LogObserver, TrialObserver, is_checkpoint};
use crate::policy::{PropertyContext, ScratchPolicy, TrialPolicy};
use crate::state::TrialState;
use crate::symbols::GameType;
use crate::weights::WeightTable;

/// Scratch card trial engine
///
/// Holds only shared, immutable data; every trial owns its state and its
/// random source, so one engine can serve trials from several threads.
#[derive(Clone)]
pub struct ScratchEngine {
    /// Validated configuration
    config: Arc<GameConfig>,
    /// Game-specific hooks
    policy: Arc<dyn TrialPolicy>,
    /// Progress observer
    observer: Arc<dyn TrialObserver>,
}

impl ScratchEngine {
    /// Create a new engine (validates the config)
    pub fn new(config: GameConfig) -> ScratchResult<Self> {
        Self::from_shared(Arc::new(config))
    }

    /// Create from an already shared config
    pub fn from_shared(config: Arc<GameConfig>) -> ScratchResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            policy: Arc::new(ScratchPolicy),
            observer: Arc::new(LogObserver),
        })
    }

    /// Create with the scratch card preset
    pub fn scratch_card() -> ScratchResult<Self> {
        Self::new(GameConfig::scratch_card())
    }

    /// Replace the trial policy
    pub fn with_policy(mut self, policy: Arc<dyn TrialPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the observer
    pub fn with_observer(mut self, observer: Arc<dyn TrialObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Get config
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get policy
    pub fn policy(&self) -> &dyn TrialPolicy {
        self.policy.as_ref()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TRIALS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Run a trial for a named distribution of a bet mode
    pub fn run_trial<R: Rng>(
        &self,
        sim_id: u64,
        bet_mode: &str,
        criteria: &str,
        rng: &mut R,
    ) -> ScratchResult<TrialBook> {
        let mode = self.config.bet_mode(bet_mode)?;
        let distribution = mode.distribution(criteria)?;
        self.run_distribution(sim_id, mode, distribution, rng)
    }

    /// Run a trial with its own seeded random source
    pub fn run_trial_seeded(
        &self,
        sim_id: u64,
        bet_mode: &str,
        criteria: &str,
        seed: u64,
    ) -> ScratchResult<TrialBook> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.run_trial(sim_id, bet_mode, criteria, &mut rng)
    }

    /// Run a trial for a distribution picked by quota
    pub fn run_quota<R: Rng>(
        &self,
        sim_id: u64,
        bet_mode: &str,
        rng: &mut R,
    ) -> ScratchResult<TrialBook> {
        let mode = self.config.bet_mode(bet_mode)?;
        let distribution = mode.pick_distribution(rng)?;
        self.run_distribution(sim_id, mode, distribution, rng)
    }

    fn run_distribution<R: Rng>(
        &self,
        sim_id: u64,
        mode: &BetMode,
        distribution: &Distribution,
        rng: &mut R,
    ) -> ScratchResult<TrialBook> {
        let budget = self.config.retry_budget;
        let wincap = self.config.wincap;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let state = self.play_attempt(mode, &distribution.conditions, rng)?;
            let win = state.total_win();
            let repeat = self
                .policy
                .repeat_required(&distribution.win_criteria, win, wincap);

            let checkpoint = AttemptCheckpoint {
                sim_id,
                bet_mode: &mode.name,
                criteria: &distribution.criteria,
                attempt,
                win,
                win_criteria: distribution.win_criteria,
            };
            if is_checkpoint(attempt) {
                self.observer.on_attempt_checkpoint(&checkpoint);
            }

            if !repeat {
                return Ok(self.finalize(sim_id, mode, distribution, state, attempt, false));
            }
            if attempt >= budget {
                self.observer.on_budget_exhausted(&checkpoint);
                return Ok(self.finalize(sim_id, mode, distribution, state, attempt, true));
            }
        }
    }

    fn finalize(
        &self,
        sim_id: u64,
        mode: &BetMode,
        distribution: &Distribution,
        state: TrialState,
        attempts: u32,
        forced: bool,
    ) -> TrialBook {
        let book = TrialBook::from_state(
            sim_id,
            &mode.name,
            &distribution.criteria,
            state,
            attempts,
            forced,
        );
        self.observer.on_trial_finalized(&book);
        book
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ATTEMPT EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play one attempt on a fresh state
    fn play_attempt<R: Rng>(
        &self,
        mode: &BetMode,
        conditions: &DistributionConditions,
        rng: &mut R,
    ) -> ScratchResult<TrialState> {
        let mut state = TrialState::new();

        let base_table = self.config.base_table(conditions);
        self.play_round(&mut state, base_table, GameType::BaseGame, mode.cost, conditions, rng)?;

        let triggered = decide_trigger(conditions, self.config.bonus.trigger_chance, rng);
        state.reveal_bonus_spot(triggered);

        if triggered {
            let bonus_table = &self.config.bonus_weights;
            BonusLoop::new(self.config.bonus.rounds).run(&mut state, |state| {
                self.play_round(state, bonus_table, GameType::FreeGame, mode.cost, conditions, rng)
            })?;
        }

        Ok(state)
    }

    /// Generate, decorate and evaluate one grid; returns the round win
    fn play_round<R: Rng>(
        &self,
        state: &mut TrialState,
        weights: &WeightTable,
        game_type: GameType,
        stake: f64,
        conditions: &DistributionConditions,
        rng: &mut R,
    ) -> ScratchResult<f64> {
        let mut grid = Grid::generate(&self.config.grid, weights, rng)?;

        let ctx = PropertyContext {
            special_symbols: &self.config.special_symbols,
            mult_values: conditions.mult_values.as_ref(),
            game_type,
        };
        self.policy
            .assign_special_properties(&mut grid, &ctx, &mut *rng)?;
        grid.ensure_shape(&self.config.grid)?;

        let multiplier = if state.in_bonus() {
            self.config.bonus.multiplier
        } else {
            1.0
        };
        let evaluation = self.config.paytable.evaluate(&grid, stake, multiplier);

        state.reveal_grid(grid);
        for win in evaluation.wins {
            state.events.push(GameEvent::Win {
                symbol: win.symbol,
                match_count: win.match_count,
                amount: win.amount,
            });
        }
        state.wins.record_round(evaluation.total_win, game_type);

        Ok(evaluation.total_win)
    }
}

impl std::fmt::Debug for ScratchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchEngine")
            .field("game_id", &self.config.game_id)
            .field("policy", &self.policy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::BonusPhase;
    use crate::config::BonusConfig;
    use crate::distribution::WinCriteria;

    fn engine() -> ScratchEngine {
        ScratchEngine::scratch_card().unwrap()
    }

    /// Complete table where only `symbol` can be drawn
    fn only(config: &GameConfig, symbol: &str) -> WeightTable {
        WeightTable::from_pairs(
            config
                .symbols
                .iter()
                .map(|s| (s.clone(), if s.as_str() == symbol { 1.0 } else { 0.0 })),
        )
    }

    #[test]
    fn test_engine_creation() {
        let engine = engine();
        assert_eq!(engine.config().retry_budget, 10_000);
        assert_eq!(engine.policy().name(), "scratch");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig::scratch_card().with_retry_budget(0);
        assert!(ScratchEngine::new(config).is_err());
    }

    #[test]
    fn test_unknown_lookups() {
        let engine = engine();
        assert!(engine.run_trial_seeded(1, "turbo", "0", 1).is_err());
        assert!(engine.run_trial_seeded(1, "base", "jackpot", 1).is_err());
    }

    #[test]
    fn test_zero_bucket_accepts_zero() {
        let engine = engine();
        for sim in 0..20 {
            let book = engine.run_trial_seeded(sim, "base", "0", sim).unwrap();
            assert!(!book.budget_exhausted);
            assert_eq!(book.final_win, 0.0);
            assert_eq!(book.count_events("win"), 0);
        }
    }

    #[test]
    fn test_wincap_bucket_first_attempt() {
        let engine = engine();
        let book = engine.run_trial_seeded(1, "base", "wincap", 42).unwrap();
        assert_eq!(book.attempts, 1);
        assert_eq!(book.final_win, 1000.0);
        assert_eq!(book.payout_multiplier, 100_000);
        assert!(!book.bonus_triggered);
    }

    #[test]
    fn test_attempt_event_order() {
        let engine = engine();
        let book = engine.run_trial_seeded(3, "base", "normal", 3).unwrap();
        assert_eq!(book.events[0].event.type_name(), "grid_reveal");
        let spot = book
            .events
            .iter()
            .position(|e| e.event.type_name() == "bonus_spot")
            .unwrap();
        assert!(book.events[1..spot].iter().all(|e| e.event.type_name() == "win"));
    }

    #[test]
    fn test_play_round_applies_bonus_multiplier() {
        let preset = GameConfig::scratch_card();
        let bonus_weights = only(&preset, "10");
        let config = preset
            .with_bonus(BonusConfig {
                rounds: 1,
                multiplier: 3.0,
                trigger_chance: 0.0,
            })
            .with_bonus_weights(bonus_weights);
        let engine = ScratchEngine::new(config).unwrap();
        let conditions = DistributionConditions::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let mut state = TrialState::new();
        state.bonus = BonusPhase::Running { round: 1, total: 1 };
        let bonus_table = engine.config().bonus_weights.clone();
        let win = engine
            .play_round(&mut state, &bonus_table, GameType::FreeGame, 1.0, &conditions, &mut rng)
            .unwrap();

        assert_eq!(win, 30.0);
        assert_eq!(state.wins.free_game_wins, 30.0);
    }

    #[test]
    fn test_forced_freegame() {
        let mut config = GameConfig::scratch_card();
        config.bet_modes[0].distributions.push(
            crate::distribution::Distribution::new("bonus", 0.0, WinCriteria::Any).with_conditions(
                DistributionConditions {
                    force_freegame: true,
                    ..Default::default()
                },
            ),
        );
        let engine = ScratchEngine::new(config).unwrap();
        let book = engine.run_trial_seeded(9, "base", "bonus", 9).unwrap();
        assert!(book.bonus_triggered);
        assert_eq!(book.count_events("bonus_round"), 5);
        assert_eq!(book.count_events("grid_reveal"), 6);
    }
}
