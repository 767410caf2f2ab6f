//! Per-attempt trial state

use crate::bonus::BonusPhase;
use crate::events::{EventLog, GameEvent};
use crate::grid::Grid;
use crate::wins::WinManager;

/// Mutable state of one attempt
///
/// A fresh state is created for every attempt; a rejected attempt's state
/// is dropped as a whole, so nothing it recorded can leak into the next one.
#[derive(Debug, Clone, Default)]
pub struct TrialState {
    /// Latest revealed grid
    pub grid: Option<Grid>,
    /// Win totals
    pub wins: WinManager,
    /// Bonus lifecycle
    pub bonus: BonusPhase,
    /// Records in emission order
    pub events: EventLog,
}

impl TrialState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal a grid: it becomes the current grid and is recorded
    pub fn reveal_grid(&mut self, grid: Grid) {
        self.events.push(GameEvent::GridReveal { grid: grid.clone() });
        self.grid = Some(grid);
    }

    /// Record the bonus spot outcome and arm the bonus when triggered
    pub fn reveal_bonus_spot(&mut self, triggered: bool) {
        self.events.push(GameEvent::BonusSpot { triggered });
        if triggered {
            self.bonus = BonusPhase::Triggered;
        }
    }

    /// Check if bonus rounds are being played (bonus multiplier applies)
    pub fn in_bonus(&self) -> bool {
        self.bonus.is_active()
    }

    /// Check if the bonus was triggered in this attempt
    pub fn bonus_triggered(&self) -> bool {
        !matches!(self.bonus, BonusPhase::Idle)
    }

    /// Total win so far
    pub fn total_win(&self) -> f64 {
        self.wins.total()
    }
}
