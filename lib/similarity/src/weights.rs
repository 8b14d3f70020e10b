//! Per-field weights
//!
//! A [`WeightSet`] says how much each embedding field counts toward the final
//! score. Weights are plain multipliers: the engine sums weighted cosine
//! similarities without renormalizing, so the score range is
//! `[-total, total]` in general and `[0, total]` for non-negative embeddings.

use animatch_core::{EmbeddingField, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from embedding field to a non-negative weight
///
/// Fields missing from the map count as weight `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightSet {
    weights: BTreeMap<EmbeddingField, f32>,
}

impl Default for WeightSet {
    /// The weights the recommendation pages ship with
    fn default() -> Self {
        Self::new()
            .with(EmbeddingField::Description, 0.25)
            .with(EmbeddingField::Genres, 0.25)
            .with(EmbeddingField::Demographic, 0.15)
            .with(EmbeddingField::Rating, 0.10)
            .with(EmbeddingField::Themes, 0.25)
    }
}

impl WeightSet {
    /// An empty weight set; every field weighs zero
    pub fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Builder-style setter
    #[must_use]
    pub fn with(mut self, field: EmbeddingField, weight: f32) -> Self {
        self.weights.insert(field, weight);
        self
    }

    /// Only `field` counts, with weight 1.0
    pub fn only(field: EmbeddingField) -> Self {
        Self::new().with(field, 1.0)
    }

    pub fn set(&mut self, field: EmbeddingField, weight: f32) {
        self.weights.insert(field, weight);
    }

    /// Weight for `field`, `0.0` when unset
    #[inline]
    pub fn get(&self, field: EmbeddingField) -> f32 {
        self.weights.get(&field).copied().unwrap_or(0.0)
    }

    /// Explicitly configured fields in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (EmbeddingField, f32)> + '_ {
        self.weights.iter().map(|(field, weight)| (*field, *weight))
    }

    pub fn total(&self) -> f32 {
        self.weights.values().sum()
    }

    /// Reject negative, NaN and infinite weights
    pub fn validate(&self) -> Result<()> {
        for (field, weight) in self.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidWeight { field, weight });
            }
        }
        Ok(())
    }

    /// Replace individual weights, leaving the others untouched
    pub fn with_overrides(&self, overrides: &BTreeMap<EmbeddingField, f32>) -> Result<WeightSet> {
        let mut modified = self.clone();
        for (field, weight) in overrides {
            modified.set(*field, *weight);
        }
        modified.validate()?;
        Ok(modified)
    }

    /// Every weight multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> WeightSet {
        Self {
            weights: self
                .weights
                .iter()
                .map(|(field, weight)| (*field, weight * factor))
                .collect(),
        }
    }

    /// Rescaled to sum to 1.0 (weighted-average semantics)
    ///
    /// Fails when the weights are invalid or all zero.
    pub fn normalized(&self) -> Result<WeightSet> {
        self.validate()?;
        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return Err(Error::InvalidInput(
                format!("cannot normalize weights that sum to {}", total),
            ));
        }
        Ok(self.scaled(1.0 / total))
    }
}
