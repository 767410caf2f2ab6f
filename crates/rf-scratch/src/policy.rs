//! Trial policy: game-specific hooks of the trial controller
//!
//! The engine calls a [`TrialPolicy`] at two points of every round:
//! after a grid is generated (special symbol properties) and after an
//! attempt is fully played (acceptance). Games override behavior by
//! injecting their own policy instead of subclassing the engine.

use rand::RngCore;

use crate::distribution::{MultValues, WinCriteria};
use crate::error::ScratchResult;
use crate::grid::Grid;
use crate::symbols::{GameType, SymbolId};

/// What the policy may look at while decorating a grid
#[derive(Debug, Clone, Copy)]
pub struct PropertyContext<'a> {
    /// Symbols that carry extra properties
    pub special_symbols: &'a [SymbolId],
    /// Multiplier tables of the active distribution
    pub mult_values: Option<&'a MultValues>,
    /// Round being played
    pub game_type: GameType,
}

impl PropertyContext<'_> {
    /// Check if a symbol is special
    pub fn is_special(&self, symbol: &SymbolId) -> bool {
        self.special_symbols.contains(symbol)
    }
}

/// Game-specific trial hooks
pub trait TrialPolicy: Send + Sync {
    /// Policy name for logging
    fn name(&self) -> &str;

    /// Attach properties to special symbols of a freshly generated grid
    fn assign_special_properties(
        &self,
        _grid: &mut Grid,
        _ctx: &PropertyContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> ScratchResult<()> {
        Ok(())
    }

    /// Check if an attempt with `final_win` must be discarded and replayed
    fn repeat_required(&self, criteria: &WinCriteria, final_win: f64, wincap: f64) -> bool;
}

/// Default scratch card policy
///
/// Special symbols receive a multiplier drawn from the distribution's
/// table for the current game type; acceptance is exact equality with the
/// criterion's target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScratchPolicy;

impl TrialPolicy for ScratchPolicy {
    fn name(&self) -> &str {
        "scratch"
    }

    fn assign_special_properties(
        &self,
        grid: &mut Grid,
        ctx: &PropertyContext<'_>,
        rng: &mut dyn RngCore,
    ) -> ScratchResult<()> {
        if ctx.special_symbols.is_empty() {
            return Ok(());
        }
        let Some(table) = ctx.mult_values.and_then(|m| m.for_game_type(ctx.game_type)) else {
            return Ok(());
        };

        let sampler = table.sampler()?;
        for cell in grid.cells_mut() {
            if ctx.is_special(&cell.symbol) {
                cell.multiplier = Some(*sampler.draw(rng));
            }
        }
        Ok(())
    }

    fn repeat_required(&self, criteria: &WinCriteria, final_win: f64, wincap: f64) -> bool {
        match criteria.target(wincap) {
            None => false,
            Some(target) => final_win != target,
        }
    }
}
