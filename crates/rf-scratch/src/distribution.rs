//! Bet modes and outcome distributions
//!
//! A bet mode owns a list of distributions. Each distribution is a named
//! acceptance criterion ("wincap", "0", "normal", ...) plus the generation
//! overrides used while a trial is being produced for it.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ScratchError, ScratchResult};
use crate::symbols::GameType;
use crate::weights::WeightTable;

/// Win criterion a trial must satisfy to be accepted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WinCriteria {
    /// Any outcome is accepted
    #[default]
    Any,
    /// The total win must equal this value exactly
    Exact(f64),
    /// The total win must equal the game's win cap exactly
    WinCap,
}

impl WinCriteria {
    /// Target value, if constrained
    pub fn target(&self, wincap: f64) -> Option<f64> {
        match self {
            Self::Any => None,
            Self::Exact(value) => Some(*value),
            Self::WinCap => Some(wincap),
        }
    }

    /// Check if any outcome is acceptable
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Multiplier values per game type for special symbols
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultValues {
    #[serde(default)]
    pub base_game: Option<WeightTable<u32>>,
    #[serde(default)]
    pub free_game: Option<WeightTable<u32>>,
}

impl MultValues {
    /// Table for a game type
    pub fn for_game_type(&self, game_type: GameType) -> Option<&WeightTable<u32>> {
        match game_type {
            GameType::BaseGame => self.base_game.as_ref(),
            GameType::FreeGame => self.free_game.as_ref(),
        }
    }
}

/// Generation overrides applied while producing a trial for a distribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionConditions {
    /// Base round weights (None = the game's base weights)
    #[serde(default)]
    pub symbol_weights: Option<WeightTable>,
    /// Suppress the bonus trigger
    #[serde(default)]
    pub force_wincap: bool,
    /// Force the bonus trigger (ignored when `force_wincap` is set)
    #[serde(default)]
    pub force_freegame: bool,
    /// Multiplier values for special symbols
    #[serde(default)]
    pub mult_values: Option<MultValues>,
}

/// A named acceptance criterion with its quota and generation overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Criteria name (e.g., "wincap", "0", "normal")
    pub criteria: String,
    /// Share of trials expected in this distribution
    pub quota: f64,
    /// Acceptance criterion
    #[serde(default)]
    pub win_criteria: WinCriteria,
    /// Generation overrides
    #[serde(default)]
    pub conditions: DistributionConditions,
}

impl Distribution {
    /// Create a distribution with default conditions
    pub fn new(criteria: impl Into<String>, quota: f64, win_criteria: WinCriteria) -> Self {
        Self {
            criteria: criteria.into(),
            quota,
            win_criteria,
            conditions: DistributionConditions::default(),
        }
    }

    /// Builder: set conditions
    pub fn with_conditions(mut self, conditions: DistributionConditions) -> Self {
        self.conditions = conditions;
        self
    }
}

/// A bet mode (cost and distributions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetMode {
    /// Mode name (e.g., "base")
    pub name: String,
    /// Cost of one trial; wins are scaled by it
    pub cost: f64,
    /// Outcome distributions
    pub distributions: Vec<Distribution>,
}

impl BetMode {
    /// Create a bet mode
    pub fn new(name: impl Into<String>, cost: f64, distributions: Vec<Distribution>) -> Self {
        Self {
            name: name.into(),
            cost,
            distributions,
        }
    }

    /// Get distribution by criteria name
    pub fn distribution(&self, criteria: &str) -> ScratchResult<&Distribution> {
        self.distributions
            .iter()
            .find(|d| d.criteria == criteria)
            .ok_or_else(|| ScratchError::UnknownDistribution {
                mode: self.name.clone(),
                criteria: criteria.to_string(),
            })
    }

    /// Pick a distribution with probability proportional to its quota
    pub fn pick_distribution<R: Rng + ?Sized>(&self, rng: &mut R) -> ScratchResult<&Distribution> {
        let quotas = WeightTable::from_pairs(self.distributions.iter().enumerate().map(|(i, d)| (i, d.quota)));
        let index = *quotas.draw(rng)?;
        Ok(&self.distributions[index])
    }

    /// Validate cost, quotas and criteria names
    pub fn validate(&self) -> ScratchResult<()> {
        if !self.cost.is_finite() || self.cost <= 0.0 {
            return Err(ScratchError::Config(format!(
                "bet mode {} has non-positive cost {}",
                self.name, self.cost
            )));
        }
        if self.distributions.is_empty() {
            return Err(ScratchError::Config(format!(
                "bet mode {} has no distributions",
                self.name
            )));
        }

        let mut names = HashSet::new();
        for distribution in &self.distributions {
            if !names.insert(distribution.criteria.as_str()) {
                return Err(ScratchError::Config(format!(
                    "bet mode {} repeats criteria {}",
                    self.name, distribution.criteria
                )));
            }
            if let WinCriteria::Exact(value) = distribution.win_criteria {
                if !value.is_finite() || value < 0.0 {
                    return Err(ScratchError::Config(format!(
                        "criteria {} targets invalid win {}",
                        distribution.criteria, value
                    )));
                }
            }
        }

        WeightTable::from_pairs(self.distributions.iter().map(|d| (d.criteria.as_str(), d.quota)))
            .validate()
            .map_err(|e| ScratchError::Config(format!("bet mode {} quotas: {}", self.name, e)))
    }
}
