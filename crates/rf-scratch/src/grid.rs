//! Scratch grid generation

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::{ScratchError, ScratchResult};
use crate::symbols::{Cell, SymbolId};
use crate::weights::WeightTable;

/// A revealed scratch grid (rows × columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create from rows of cells
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Create from rows of plain symbols
    pub fn from_symbols(rows: Vec<Vec<SymbolId>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Cell::new).collect())
                .collect(),
        )
    }

    /// Fill a grid with independent draws from one weight table
    pub fn generate<R: Rng + ?Sized>(
        spec: &GridSpec,
        weights: &WeightTable,
        rng: &mut R,
    ) -> ScratchResult<Self> {
        let sampler = weights.sampler()?;
        let mut rows = Vec::with_capacity(spec.rows as usize);
        for _ in 0..spec.rows {
            let mut row = Vec::with_capacity(spec.columns as usize);
            for _ in 0..spec.columns {
                row.push(Cell::new(sampler.draw(rng).clone()));
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    /// Rows of cells
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// All cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// All cells, mutable
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.rows.iter_mut().flatten()
    }

    /// Symbol at (row, column)
    pub fn symbol_at(&self, row: usize, column: usize) -> Option<&SymbolId> {
        self.rows.get(row)?.get(column).map(|c| &c.symbol)
    }

    /// Occurrences of each symbol
    pub fn symbol_counts(&self) -> HashMap<&SymbolId, u32> {
        let mut counts = HashMap::new();
        for cell in self.cells() {
            *counts.entry(&cell.symbol).or_insert(0) += 1;
        }
        counts
    }

    /// Plain symbol snapshot
    pub fn symbols(&self) -> Vec<Vec<SymbolId>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.symbol.clone()).collect())
            .collect()
    }

    /// Fail unless every row has exactly `spec.columns` cells and there are `spec.rows` rows
    pub fn ensure_shape(&self, spec: &GridSpec) -> ScratchResult<()> {
        let expected_rows = spec.rows as usize;
        let expected_columns = spec.columns as usize;
        let ragged = self.rows.iter().any(|r| r.len() != expected_columns);
        if self.rows.len() != expected_rows || ragged {
            return Err(ScratchError::GridShape {
                expected_rows,
                expected_columns,
                rows: self.row_count(),
                columns: self.column_count(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_shape() {
        let spec = GridSpec::scratch_4x2();
        let weights = WeightTable::new().with("1", 1.0).with("2", 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let grid = Grid::generate(&spec, &weights, &mut rng).unwrap();
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cells().count(), 8);
        grid.ensure_shape(&spec).unwrap();
    }

    #[test]
    fn test_single_symbol_fills_grid() {
        let spec = GridSpec::scratch_4x2();
        let weights = WeightTable::new().with("1000", 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let grid = Grid::generate(&spec, &weights, &mut rng).unwrap();
        assert!(grid.cells().all(|c| c.symbol.as_str() == "1000"));
        assert_eq!(grid.symbol_counts()[&SymbolId::from("1000")], 8);
    }

    #[test]
    fn test_generate_rejects_bad_weights() {
        let spec = GridSpec::scratch_4x2();
        let weights = WeightTable::new().with("1", 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(matches!(
            Grid::generate(&spec, &weights, &mut rng),
            Err(ScratchError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let grid = Grid::from_symbols(vec![vec!["1".into(), "2".into()], vec!["1".into()]]);
        assert!(matches!(
            grid.ensure_shape(&GridSpec::new(2, 2)),
            Err(ScratchError::GridShape { .. })
        ));
        assert!(grid.ensure_shape(&GridSpec::new(3, 2)).is_err());
    }

    #[test]
    fn test_symbol_at() {
        let grid = Grid::from_symbols(vec![vec!["1".into(), "2".into()]]);
        assert_eq!(grid.symbol_at(0, 1).unwrap().as_str(), "2");
        assert!(grid.symbol_at(1, 0).is_none());
    }
}
