//! Paytable and win evaluation
//!
//! A scratch card pays per symbol, not per line: every symbol revealed at
//! least `required_matches` times anywhere on the grid pays its value once.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ScratchError, ScratchResult};
use crate::grid::Grid;
use crate::symbols::SymbolId;

/// Pay value of one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayEntry {
    pub symbol: SymbolId,
    /// Pay value (bet multiplier) once the match threshold is met
    pub value: f64,
}

/// Complete paytable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayTable {
    /// Matching symbols needed for a win
    pub required_matches: u32,
    /// Pay values in symbol table order
    pub entries: Vec<PayEntry>,
}

/// Win on a single symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolWin {
    /// Winning symbol
    pub symbol: SymbolId,
    /// Number of cells showing the symbol
    pub match_count: u32,
    /// Win amount (pay value × stake × multiplier)
    pub amount: f64,
}

/// Result of evaluating a grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Symbol wins in paytable order
    pub wins: Vec<SymbolWin>,
    /// Total win amount
    pub total_win: f64,
}

impl PayTable {
    /// Create an empty paytable
    pub fn new(required_matches: u32) -> Self {
        Self {
            required_matches,
            entries: Vec::new(),
        }
    }

    /// Builder: add a pay value
    pub fn with(mut self, symbol: impl Into<SymbolId>, value: f64) -> Self {
        self.entries.push(PayEntry {
            symbol: symbol.into(),
            value,
        });
        self
    }

    /// Pay value of a symbol
    pub fn get(&self, symbol: &SymbolId) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| &e.symbol == symbol)
            .map(|e| e.value)
    }

    /// Symbols in table order
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolId> {
        self.entries.iter().map(|e| &e.symbol)
    }

    /// Check threshold and pay values
    pub fn validate(&self) -> ScratchResult<()> {
        if self.required_matches == 0 {
            return Err(ScratchError::Config("required matches must be at least 1".into()));
        }
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(&entry.symbol) {
                return Err(ScratchError::Config(format!(
                    "symbol {} is listed twice in the paytable",
                    entry.symbol
                )));
            }
            if !entry.value.is_finite() || entry.value < 0.0 {
                return Err(ScratchError::Config(format!(
                    "symbol {} pays invalid value {}",
                    entry.symbol, entry.value
                )));
            }
        }
        Ok(())
    }

    /// Evaluate wins on a grid
    ///
    /// `multiplier` is the bonus multiplier during bonus rounds and 1.0
    /// otherwise. Symbols below the threshold contribute nothing, so a grid
    /// without a qualifying symbol evaluates to exactly 0.0.
    pub fn evaluate(&self, grid: &Grid, stake: f64, multiplier: f64) -> Evaluation {
        let counts = grid.symbol_counts();
        let mut wins = Vec::new();

        for entry in &self.entries {
            let count = counts.get(&entry.symbol).copied().unwrap_or(0);
            if count >= self.required_matches {
                wins.push(SymbolWin {
                    symbol: entry.symbol.clone(),
                    match_count: count,
                    amount: entry.value * stake * multiplier,
                });
            }
        }

        let total_win = wins.iter().map(|w| w.amount).sum();
        Evaluation { wins, total_win }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paytable() -> PayTable {
        PayTable::new(3).with("1", 1.0).with("5", 5.0).with("1000", 1000.0)
    }

    fn grid(rows: &[[&str; 2]]) -> Grid {
        Grid::from_symbols(
            rows.iter()
                .map(|r| r.iter().map(|&s| SymbolId::from(s)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_threshold_and_zero_win() {
        let g = grid(&[["1", "5"], ["1", "5"], ["1000", "1000"], ["5", "1000"]]);
        // "5" appears 3 times, "1" twice, "1000" three times
        let eval = paytable().evaluate(&g, 1.0, 1.0);
        assert_eq!(eval.wins.len(), 2);
        assert_eq!(eval.total_win, 1005.0);

        let g = grid(&[["1", "5"], ["1", "5"], ["1000", "1000"], ["2", "2"]]);
        let eval = paytable().evaluate(&g, 1.0, 1.0);
        assert!(eval.wins.is_empty());
        assert_eq!(eval.total_win, 0.0);
    }

    #[test]
    fn test_wins_follow_paytable_order() {
        let g = grid(&[["1000", "1"], ["1000", "1"], ["1000", "1"], ["5", "5"]]);
        let eval = paytable().evaluate(&g, 1.0, 1.0);
        let symbols: Vec<&str> = eval.wins.iter().map(|w| w.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["1", "1000"]);
    }

    #[test]
    fn test_stake_and_multiplier_scale() {
        let g = grid(&[["5", "5"], ["5", "5"], ["5", "5"], ["5", "5"]]);
        let eval = paytable().evaluate(&g, 2.0, 3.0);
        assert_eq!(eval.wins[0].match_count, 8);
        assert_eq!(eval.total_win, 5.0 * 2.0 * 3.0);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        assert!(PayTable::new(0).with("1", 1.0).validate().is_err());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let table = paytable().with("1000", 1000.0);
        assert!(matches!(table.validate(), Err(ScratchError::Config(_))));
        paytable().validate().unwrap();
    }
}
