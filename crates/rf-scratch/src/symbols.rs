//! Symbol identifiers and the scratch card alphabet

use serde::{Deserialize, Serialize};

/// Opaque symbol identifier (e.g., "1", "500", "1000")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub String);

impl SymbolId {
    /// Create a new symbol ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SymbolId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SymbolId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game type a round is played in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    /// The paid base round
    #[default]
    BaseGame,
    /// Bonus rounds
    FreeGame,
}

/// One cell of a generated grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Symbol drawn into this cell
    pub symbol: SymbolId,
    /// Special multiplier property, assigned by the trial policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
}

impl Cell {
    /// Create a plain cell with no special properties
    pub fn new(symbol: SymbolId) -> Self {
        Self {
            symbol,
            multiplier: None,
        }
    }
}

/// Build an alphabet from string literals
pub fn alphabet(ids: &[&str]) -> Vec<SymbolId> {
    ids.iter().map(|&id| SymbolId::from(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_id_roundtrip_json() {
        let id = SymbolId::from("1000");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1000\"");
        assert_eq!(id.to_string(), "1000");
    }

    #[test]
    fn test_cell_hides_missing_multiplier() {
        let cell = Cell::new("5".into());
        let json = serde_json::to_value(&cell).unwrap();
        assert!(json.get("multiplier").is_none());
    }

    #[test]
    fn test_alphabet_order() {
        let ids = alphabet(&["1", "2", "5"]);
        assert_eq!(ids[2].as_str(), "5");
    }
}
