//! Scratch card game configuration
//!
//! [`GameConfig`] is the immutable value every trial reads from: grid shape,
//! alphabet, payouts, weight tables, bonus parameters, win cap, retry budget
//! and bet modes. It is validated once by [`GameConfig::validate`] (the
//! engine constructor calls it) so the trial loop can rely on its
//! invariants.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distribution::{BetMode, Distribution, DistributionConditions, MultValues, WinCriteria};
use crate::error::{ScratchError, ScratchResult};
use crate::paytable::PayTable;
use crate::symbols::{SymbolId, alphabet};
use crate::weights::WeightTable;

/// Default retry budget per trial
pub const DEFAULT_RETRY_BUDGET: u32 = 10_000;

fn default_retry_budget() -> u32 {
    DEFAULT_RETRY_BUDGET
}

/// Grid specification (rows × columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of rows
    pub rows: u8,
    /// Number of cells per row
    pub columns: u8,
}

impl GridSpec {
    /// Create a grid spec
    pub fn new(rows: u8, columns: u8) -> Self {
        Self { rows, columns }
    }

    /// Standard 4×2 scratch card
    pub fn scratch_4x2() -> Self {
        Self::new(4, 2)
    }

    /// Total grid positions
    pub fn total_cells(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::scratch_4x2()
    }
}

/// Bonus (free round) parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusConfig {
    /// Rounds played once the bonus triggers
    pub rounds: u32,
    /// Multiplier applied to wins during bonus rounds
    pub multiplier: f64,
    /// Probability that the bonus spot triggers (0.0 - 1.0)
    pub trigger_chance: f64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            rounds: 5,
            multiplier: 2.0,
            trigger_chance: 0.02,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game identifier
    pub game_id: String,
    /// Human readable name
    pub working_name: String,
    /// Grid shape
    pub grid: GridSpec,
    /// Symbol alphabet, in table order
    pub symbols: Vec<SymbolId>,
    /// Payouts and match threshold
    pub paytable: PayTable,
    /// Weights used by the base round unless a distribution overrides them
    pub base_weights: WeightTable,
    /// Weights used by bonus rounds
    pub bonus_weights: WeightTable,
    /// Bonus parameters
    pub bonus: BonusConfig,
    /// Maximum payout cap (in bet units)
    pub wincap: f64,
    /// Attempts allowed per trial before the last attempt is force-accepted
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,
    /// Symbols that receive a special multiplier property
    #[serde(default)]
    pub special_symbols: Vec<SymbolId>,
    /// Bet modes
    pub bet_modes: Vec<BetMode>,
}

impl GameConfig {
    /// The classic 4×2 scratch card
    ///
    /// Nine face-value symbols pay their value once three or more of them
    /// are revealed. The bonus spot triggers five free rounds at ×2 with
    /// better odds.
    pub fn scratch_card() -> Self {
        let symbols = alphabet(&["1", "2", "5", "10", "20", "50", "100", "500", "1000"]);

        let paytable = PayTable::new(3)
            .with("1", 1.0)
            .with("2", 2.0)
            .with("5", 5.0)
            .with("10", 10.0)
            .with("20", 20.0)
            .with("50", 50.0)
            .with("100", 100.0)
            .with("500", 500.0)
            .with("1000", 1000.0);

        let base_weights = WeightTable::new()
            .with("1", 100.0)
            .with("2", 80.0)
            .with("5", 60.0)
            .with("10", 40.0)
            .with("20", 30.0)
            .with("50", 20.0)
            .with("100", 10.0)
            .with("500", 5.0)
            .with("1000", 1.0);

        let bonus_weights = WeightTable::new()
            .with("1", 80.0)
            .with("2", 70.0)
            .with("5", 50.0)
            .with("10", 35.0)
            .with("20", 25.0)
            .with("50", 15.0)
            .with("100", 8.0)
            .with("500", 3.0)
            .with("1000", 1.0);

        let wincap = 1000.0;

        let distributions = vec![
            Distribution::new("wincap", 0.001, WinCriteria::WinCap).with_conditions(
                DistributionConditions {
                    symbol_weights: Some(WeightTable::new().with("1000", 1.0)),
                    force_wincap: true,
                    ..Default::default()
                },
            ),
            Distribution::new("0", 0.3, WinCriteria::Exact(0.0)).with_conditions(
                DistributionConditions {
                    symbol_weights: Some(
                        WeightTable::new()
                            .with("1", 1.0)
                            .with("2", 1.0)
                            .with("5", 1.0)
                            .with("10", 1.0)
                            .with("20", 1.0),
                    ),
                    ..Default::default()
                },
            ),
            Distribution::new("normal", 0.699, WinCriteria::Any),
        ];

        Self {
            game_id: "scratch_card".into(),
            working_name: "Scratch Card Game".into(),
            grid: GridSpec::scratch_4x2(),
            symbols,
            paytable,
            base_weights,
            bonus_weights,
            bonus: BonusConfig::default(),
            wincap,
            retry_budget: DEFAULT_RETRY_BUDGET,
            special_symbols: Vec::new(),
            bet_modes: vec![BetMode::new("base", 1.0, distributions)],
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BUILDERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Builder: set grid shape
    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    /// Builder: set bonus parameters
    pub fn with_bonus(mut self, bonus: BonusConfig) -> Self {
        self.bonus = bonus;
        self
    }

    /// Builder: set win cap
    pub fn with_wincap(mut self, wincap: f64) -> Self {
        self.wincap = wincap;
        self
    }

    /// Builder: set retry budget
    pub fn with_retry_budget(mut self, budget: u32) -> Self {
        self.retry_budget = budget;
        self
    }

    /// Builder: set bonus round weights
    pub fn with_bonus_weights(mut self, weights: WeightTable) -> Self {
        self.bonus_weights = weights;
        self
    }

    /// Builder: replace bet modes
    pub fn with_bet_modes(mut self, bet_modes: Vec<BetMode>) -> Self {
        self.bet_modes = bet_modes;
        self
    }

    /// Builder: set special symbols
    pub fn with_special_symbols(mut self, symbols: Vec<SymbolId>) -> Self {
        self.special_symbols = symbols;
        self
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUP
    // ═══════════════════════════════════════════════════════════════════════════

    /// Get bet mode by name
    pub fn bet_mode(&self, name: &str) -> ScratchResult<&BetMode> {
        self.bet_modes
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ScratchError::UnknownBetMode(name.to_string()))
    }

    /// Weight table for the base round of a distribution
    pub fn base_table<'a>(&'a self, conditions: &'a DistributionConditions) -> &'a WeightTable {
        conditions
            .symbol_weights
            .as_ref()
            .unwrap_or(&self.base_weights)
    }

    /// Check if a symbol is part of the alphabet
    pub fn has_symbol(&self, symbol: &SymbolId) -> bool {
        self.symbols.contains(symbol)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Parse a JSON config (not validated)
    pub fn from_json(json: &str) -> ScratchResult<Self> {
        serde_json::from_str(json).map_err(|e| ScratchError::Serialization(e.to_string()))
    }

    /// Parse a YAML config (not validated)
    pub fn from_yaml(yaml: &str) -> ScratchResult<Self> {
        serde_yml::from_str(yaml).map_err(|e| ScratchError::Serialization(e.to_string()))
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> ScratchResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScratchError::Serialization(e.to_string()))
    }

    /// Load and validate a config file (`.json`, `.yaml` or `.yml`)
    pub fn load(path: impl AsRef<Path>) -> ScratchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&text)?,
            other => {
                return Err(ScratchError::Config(format!(
                    "unsupported config extension {:?} for {}",
                    other,
                    path.display()
                )));
            }
        };
        config.validate()?;
        log::info!(
            "Loaded game config '{}' from {} ({} symbols, {} bet modes)",
            config.game_id,
            path.display(),
            config.symbols.len(),
            config.bet_modes.len()
        );
        Ok(config)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Validate all invariants the trial loop relies on
    pub fn validate(&self) -> ScratchResult<()> {
        if self.grid.rows == 0 || self.grid.columns == 0 {
            return Err(ScratchError::Config(format!(
                "grid must not be empty ({}x{})",
                self.grid.rows, self.grid.columns
            )));
        }

        if self.symbols.is_empty() {
            return Err(ScratchError::Config("symbol alphabet is empty".into()));
        }
        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            if !seen.insert(symbol) {
                return Err(ScratchError::Config(format!("duplicate symbol {}", symbol)));
            }
        }

        self.paytable.validate()?;
        self.require_complete("paytable", self.paytable.symbols())?;
        self.require_complete("base_weights", self.base_weights.keys())?;
        self.require_complete("bonus_weights", self.bonus_weights.keys())?;
        self.base_weights.validate()?;
        self.bonus_weights.validate()?;

        if !(0.0..=1.0).contains(&self.bonus.trigger_chance) {
            return Err(ScratchError::Config(format!(
                "bonus trigger chance {} is outside 0..=1",
                self.bonus.trigger_chance
            )));
        }
        if !self.bonus.multiplier.is_finite() || self.bonus.multiplier < 0.0 {
            return Err(ScratchError::Config(format!(
                "bonus multiplier {} must be a non-negative number",
                self.bonus.multiplier
            )));
        }
        if !self.wincap.is_finite() || self.wincap <= 0.0 {
            return Err(ScratchError::Config(format!(
                "wincap {} must be positive",
                self.wincap
            )));
        }
        if self.retry_budget == 0 {
            return Err(ScratchError::Config("retry budget must be at least 1".into()));
        }
        for symbol in &self.special_symbols {
            if !self.has_symbol(symbol) {
                return Err(ScratchError::UnknownSymbol(symbol.to_string()));
            }
        }

        if self.bet_modes.is_empty() {
            return Err(ScratchError::Config("no bet modes configured".into()));
        }
        let mut names = HashSet::new();
        for mode in &self.bet_modes {
            if !names.insert(mode.name.as_str()) {
                return Err(ScratchError::Config(format!("duplicate bet mode {}", mode.name)));
            }
            mode.validate()?;
            for distribution in &mode.distributions {
                self.validate_conditions(&distribution.conditions)?;
            }
        }

        Ok(())
    }

    /// Every alphabet symbol must appear in the table, and nothing else may
    fn require_complete<'a>(
        &self,
        table: &str,
        keys: impl Iterator<Item = &'a SymbolId>,
    ) -> ScratchResult<()> {
        let keys: HashSet<&SymbolId> = keys.collect();
        for key in &keys {
            if !self.has_symbol(key) {
                return Err(ScratchError::UnknownSymbol(format!("{} in {}", key, table)));
            }
        }
        if let Some(missing) = self.symbols.iter().find(|s| !keys.contains(s)) {
            return Err(ScratchError::Config(format!(
                "symbol {} has no entry in {}",
                missing, table
            )));
        }
        Ok(())
    }

    fn validate_conditions(&self, conditions: &DistributionConditions) -> ScratchResult<()> {
        if let Some(weights) = &conditions.symbol_weights {
            if let Some(unknown) = weights.keys().find(|k| !self.has_symbol(k)) {
                return Err(ScratchError::UnknownSymbol(format!(
                    "{} in distribution weights",
                    unknown
                )));
            }
            weights.validate()?;
        }
        if let Some(MultValues {
            base_game,
            free_game,
        }) = &conditions.mult_values
        {
            for table in [base_game, free_game].into_iter().flatten() {
                table.validate()?;
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::scratch_card()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScratchEngine;

    #[test]
    fn test_scratch_card_is_valid() {
        let config = GameConfig::scratch_card();
        config.validate().unwrap();
        assert_eq!(config.grid.total_cells(), 8);
        assert_eq!(config.retry_budget, 10_000);
        assert_eq!(config.bet_mode("base").unwrap().cost, 1.0);
    }

    #[test]
    fn test_unknown_bet_mode() {
        let config = GameConfig::scratch_card();
        assert!(matches!(
            config.bet_mode("bonus"),
            Err(ScratchError::UnknownBetMode(_))
        ));
    }

    #[test]
    fn test_missing_weight_entry_rejected() {
        let mut config = GameConfig::scratch_card();
        config.bonus_weights = WeightTable::new().with("1", 1.0);
        assert!(matches!(config.validate(), Err(ScratchError::Config(_))));
    }

    #[test]
    fn test_repeated_paytable_symbol_rejected() {
        let mut config = GameConfig::scratch_card();
        config.paytable = config.paytable.clone().with("1000", 1000.0);
        assert!(matches!(config.validate(), Err(ScratchError::Config(_))));
        assert!(ScratchEngine::new(config).is_err());
    }

    #[test]
    fn test_repeated_weight_symbol_rejected() {
        let mut value = serde_json::to_value(GameConfig::scratch_card()).unwrap();
        value["base_weights"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!(["1000", 50.0]));
        let config: GameConfig = serde_json::from_value(value).unwrap();
        assert!(matches!(config.validate(), Err(ScratchError::InvalidWeights(_))));
    }

    #[test]
    fn test_unknown_override_symbol_rejected() {
        let mut config = GameConfig::scratch_card();
        config.bet_modes[0].distributions[0].conditions.symbol_weights =
            Some(WeightTable::new().with("7777", 1.0));
        assert!(matches!(config.validate(), Err(ScratchError::UnknownSymbol(_))));
    }

    #[test]
    fn test_zero_retry_budget_rejected() {
        let config = GameConfig::scratch_card().with_retry_budget(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_trigger_chance_rejected() {
        let config = GameConfig::scratch_card().with_bonus(BonusConfig {
            trigger_chance: 1.5,
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_grid_rejected() {
        let config = GameConfig::scratch_card().with_grid(GridSpec::new(0, 2));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::scratch_card();
        let json = config.to_json().unwrap();
        let back = GameConfig::from_json(&json).unwrap();
        back.validate().unwrap();
        assert_eq!(back.symbols, config.symbols);
        assert_eq!(back.bet_modes[0].distributions.len(), 3);
    }

    #[test]
    fn test_retry_budget_defaults_when_missing() {
        let mut value = serde_json::to_value(GameConfig::scratch_card()).unwrap();
        value.as_object_mut().unwrap().remove("retry_budget");
        let config: GameConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.retry_budget, DEFAULT_RETRY_BUDGET);
    }

    #[test]
    fn test_yaml_parse() {
        let yaml = serde_yml::to_string(&GameConfig::scratch_card()).unwrap();
        let config = GameConfig::from_yaml(&yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.game_id, "scratch_card");
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("rf_scratch_config.toml");
        std::fs::write(&path, "x = 1").unwrap();
        assert!(matches!(GameConfig::load(&path), Err(ScratchError::Config(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_base_table_falls_back() {
        let config = GameConfig::scratch_card();
        let conditions = DistributionConditions::default();
        assert_eq!(config.base_table(&conditions), &config.base_weights);
    }
}
