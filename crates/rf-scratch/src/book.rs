//! Finalized trial record

use serde::{Deserialize, Serialize};

use crate::error::{ScratchError, ScratchResult};
use crate::events::{GameEvent, IndexedEvent, to_cents};
use crate::state::TrialState;
use crate::symbols::GameType;

/// Result of one trial: the accepted (or forced) attempt and its records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBook {
    /// Simulation id
    pub id: u64,
    /// Bet mode name
    pub bet_mode: String,
    /// Distribution criteria name
    pub criteria: String,
    /// Total win of the finalized attempt
    pub final_win: f64,
    /// Final win in hundredths
    pub payout_multiplier: u64,
    /// Win from the base round
    pub base_game_wins: f64,
    /// Win from bonus rounds
    pub free_game_wins: f64,
    /// Bonus was triggered
    pub bonus_triggered: bool,
    /// Attempts played, the finalized one included
    pub attempts: u32,
    /// Retry budget ran out and the last attempt was kept regardless
    pub budget_exhausted: bool,
    /// Records of the finalized attempt
    pub events: Vec<IndexedEvent>,
}

impl TrialBook {
    /// Create from a finished attempt
    pub fn from_state(
        id: u64,
        bet_mode: impl Into<String>,
        criteria: impl Into<String>,
        state: TrialState,
        attempts: u32,
        budget_exhausted: bool,
    ) -> Self {
        let final_win = state.total_win();
        Self {
            id,
            bet_mode: bet_mode.into(),
            criteria: criteria.into(),
            final_win,
            payout_multiplier: to_cents(final_win),
            base_game_wins: state.wins.game_type_wins(GameType::BaseGame),
            free_game_wins: state.wins.game_type_wins(GameType::FreeGame),
            bonus_triggered: state.bonus_triggered(),
            attempts,
            budget_exhausted,
            events: state.events.into_vec(),
        }
    }

    /// Events of one type, in emission order
    pub fn events_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a GameEvent> {
        self.events
            .iter()
            .map(|e| &e.event)
            .filter(move |e| e.type_name() == type_name)
    }

    /// Number of events of one type
    pub fn count_events(&self, type_name: &str) -> usize {
        self.events_of_type(type_name).count()
    }

    /// Sum of all win records
    pub fn recorded_win(&self) -> f64 {
        self.events_of_type("win").filter_map(|e| e.amount()).sum()
    }

    /// Serialize to JSON
    pub fn to_json(&self, pretty: bool) -> ScratchResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| ScratchError::Serialization(e.to_string()))
    }
}
