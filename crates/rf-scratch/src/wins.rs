//! Per-attempt win accumulator

use serde::{Deserialize, Serialize};

use crate::symbols::GameType;

/// Running win totals of one attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinManager {
    /// Win of the latest round
    pub spin_win: f64,
    /// Total win of the attempt so far
    pub running_bet_win: f64,
    /// Wins attributed to the base round
    pub base_game_wins: f64,
    /// Wins attributed to bonus rounds
    pub free_game_wins: f64,
}

impl WinManager {
    /// Create a zeroed accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a round win
    pub fn record_round(&mut self, amount: f64, game_type: GameType) {
        self.spin_win = amount;
        self.running_bet_win += amount;
        match game_type {
            GameType::BaseGame => self.base_game_wins += amount,
            GameType::FreeGame => self.free_game_wins += amount,
        }
    }

    /// Total attributed to a game type
    pub fn game_type_wins(&self, game_type: GameType) -> f64 {
        match game_type {
            GameType::BaseGame => self.base_game_wins,
            GameType::FreeGame => self.free_game_wins,
        }
    }

    /// Total win of the attempt
    pub fn total(&self) -> f64 {
        self.running_bet_win
    }
}
