//! Trial event records
//!
//! Records are appended in emission order while an attempt plays out and
//! are only handed out as part of a finalized [`crate::book::TrialBook`].

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::symbols::SymbolId;

/// One occurrence inside a trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A grid was revealed (base or bonus round)
    GridReveal { grid: Grid },
    /// A symbol met the match threshold
    Win {
        symbol: SymbolId,
        match_count: u32,
        amount: f64,
    },
    /// The bonus spot was revealed
    BonusSpot { triggered: bool },
    /// Bonus rounds start
    BonusStart { round_count: u32 },
    /// A bonus round is about to be played (1-based index)
    BonusRound { index: u32, total: u32 },
    /// Bonus rounds are over
    BonusEnd { bonus_total: f64 },
}

impl GameEvent {
    /// Event type name as serialized
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::GridReveal { .. } => "grid_reveal",
            Self::Win { .. } => "win",
            Self::BonusSpot { .. } => "bonus_spot",
            Self::BonusStart { .. } => "bonus_start",
            Self::BonusRound { .. } => "bonus_round",
            Self::BonusEnd { .. } => "bonus_end",
        }
    }

    /// Win amount carried by this event, if any
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Win { amount, .. } => Some(*amount),
            Self::BonusEnd { bonus_total } => Some(*bonus_total),
            _ => None,
        }
    }
}

/// Event with its position in the trial's record list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEvent {
    pub index: usize,
    #[serde(flatten)]
    pub event: GameEvent,
}

/// Append-only record list of one attempt
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<IndexedEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn push(&mut self, event: GameEvent) {
        let index = self.events.len();
        self.events.push(IndexedEvent { index, event });
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in emission order
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().map(|e| &e.event)
    }

    /// Last event
    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last().map(|e| &e.event)
    }

    /// Consume into the indexed list
    pub fn into_vec(self) -> Vec<IndexedEvent> {
        self.events
    }
}

/// Convert a win amount to integer hundredths (cents)
pub fn to_cents(amount: f64) -> u64 {
    (amount.max(0.0) * 100.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexes_follow_emission_order() {
        let mut log = EventLog::new();
        log.push(GameEvent::BonusSpot { triggered: false });
        log.push(GameEvent::BonusStart { round_count: 5 });
        let events = log.into_vec();
        assert_eq!(events[0].index, 0);
        assert_eq!(events[1].index, 1);
        assert_eq!(events[1].event.type_name(), "bonus_start");
    }

    #[test]
    fn test_event_json_shape() {
        let event = IndexedEvent {
            index: 3,
            event: GameEvent::Win {
                symbol: "50".into(),
                match_count: 4,
                amount: 50.0,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "win");
        assert_eq!(json["index"], 3);
        assert_eq!(json["symbol"], "50");
        assert_eq!(json["match_count"], 4);
    }

    #[test]
    fn test_to_cents() {
        assert_eq!(to_cents(12.34), 1234);
        assert_eq!(to_cents(1000.0), 100_000);
        assert_eq!(to_cents(-1.0), 0);
    }

    #[test]
    fn test_amount() {
        assert_eq!(GameEvent::BonusEnd { bonus_total: 4.0 }.amount(), Some(4.0));
        assert_eq!(GameEvent::BonusSpot { triggered: true }.amount(), None);
    }
}
