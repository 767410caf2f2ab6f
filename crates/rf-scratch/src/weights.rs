//! Weight tables and the weighted sampler
//!
//! Every random choice in a trial goes through a [`WeightTable`]: symbol
//! draws for grid cells, special multiplier values and distribution quotas.
//! The random source is always supplied by the caller so a trial can be
//! replayed from its seed.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::error::{ScratchError, ScratchResult};
use crate::symbols::SymbolId;

/// Ordered key → weight table
///
/// Serialized as a list of `[key, weight]` pairs so that table order is
/// preserved in JSON and YAML configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable<K = SymbolId> {
    entries: Vec<(K, f64)>,
}

impl<K> Default for WeightTable<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> WeightTable<K> {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from (key, weight) pairs, keeping their order
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        let mut table = Self::new();
        for (key, weight) in pairs {
            table.insert(key, weight);
        }
        table
    }

    /// Builder: add or replace an entry
    pub fn with(mut self, key: impl Into<K>, weight: f64) -> Self {
        self.insert(key.into(), weight);
        self
    }

    /// Insert or replace the weight of a key (replacing keeps the position)
    pub fn insert(&mut self, key: K, weight: f64) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((key, weight)),
        }
    }

    /// Weight of a key (0.0 when absent)
    pub fn weight(&self, key: &K) -> f64 {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// Check if a key has an entry
    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in table order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Entries in table order
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.entries.iter().map(|(k, w)| (k, *w))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Normalized probability of a key
    pub fn probability(&self, key: &K) -> f64 {
        let total = self.total_weight();
        if total > 0.0 {
            self.weight(key) / total
        } else {
            0.0
        }
    }

    /// Check that the table can be sampled from
    pub fn validate(&self) -> ScratchResult<()> {
        if self.entries.is_empty() {
            return Err(ScratchError::InvalidWeights("table is empty".into()));
        }
        if let Some(pos) = self
            .entries
            .iter()
            .position(|(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(ScratchError::InvalidWeights(format!(
                "entry {} has weight {}",
                pos, self.entries[pos].1
            )));
        }
        if let Some(pos) = self
            .entries
            .iter()
            .enumerate()
            .position(|(i, (k, _))| self.entries[..i].iter().any(|(other, _)| other == k))
        {
            return Err(ScratchError::InvalidWeights(format!(
                "entry {} repeats an earlier key",
                pos
            )));
        }
        if self.total_weight() <= 0.0 {
            return Err(ScratchError::InvalidWeights("all weights are zero".into()));
        }
        Ok(())
    }

    /// Build a sampler for repeated draws from this table
    pub fn sampler(&self) -> ScratchResult<WeightedSampler<'_, K>> {
        WeightedSampler::new(self)
    }

    /// Draw one key with probability proportional to its weight
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ScratchResult<&K> {
        Ok(self.sampler()?.draw(rng))
    }
}

/// Prepared sampler over a validated [`WeightTable`]
pub struct WeightedSampler<'a, K> {
    keys: Vec<&'a K>,
    index: WeightedIndex<f64>,
}

impl<'a, K: PartialEq> WeightedSampler<'a, K> {
    /// Validate the table and prepare the cumulative weights
    pub fn new(table: &'a WeightTable<K>) -> ScratchResult<Self> {
        table.validate()?;
        let index = WeightedIndex::new(table.entries.iter().map(|(_, w)| *w))
            .map_err(|e| ScratchError::InvalidWeights(e.to_string()))?;
        Ok(Self {
            keys: table.keys().collect(),
            index,
        })
    }

    /// Draw one key; zero-weight keys are never returned
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a K {
        self.keys[self.index.sample(rng)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn table() -> WeightTable {
        WeightTable::new().with("1", 3.0).with("2", 1.0).with("5", 0.0)
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut t = table();
        t.insert("1".into(), 7.0);
        let keys: Vec<&str> = t.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "5"]);
        assert_eq!(t.weight(&"1".into()), 7.0);
        assert_eq!(t.weight(&"missing".into()), 0.0);
    }

    #[test]
    fn test_empty_table_rejected() {
        let t: WeightTable = WeightTable::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(t.draw(&mut rng), Err(ScratchError::InvalidWeights(_))));
    }

    #[test]
    fn test_all_zero_rejected() {
        let t: WeightTable = WeightTable::new().with("1", 0.0).with("2", 0.0);
        assert!(matches!(t.validate(), Err(ScratchError::InvalidWeights(_))));
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        let t: WeightTable = WeightTable::new().with("1", 1.0).with("2", -1.0);
        assert!(t.validate().is_err());
        let t: WeightTable = WeightTable::new().with("1", f64::NAN);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_repeated_key_rejected() {
        let t: WeightTable = serde_json::from_str(r#"[["1",1.0],["2",1.0],["1",5.0]]"#).unwrap();
        assert_eq!(t.len(), 3);
        assert!(matches!(t.validate(), Err(ScratchError::InvalidWeights(_))));
        assert!(t.sampler().is_err());
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let t = table();
        let sampler = t.sampler().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10_000 {
            assert_ne!(sampler.draw(&mut rng).as_str(), "5");
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let t = table();
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(t.draw(&mut a).unwrap(), t.draw(&mut b).unwrap());
        }
    }

    #[test]
    fn test_serde_pairs() {
        let t = table();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"[["1",3.0],["2",1.0],["5",0.0]]"#);
        let back: WeightTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_probability() {
        let t = table();
        assert_eq!(t.probability(&"1".into()), 0.75);
        assert_eq!(t.probability(&"5".into()), 0.0);
    }
}
