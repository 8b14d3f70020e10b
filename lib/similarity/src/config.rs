//! Ranking configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "weights": { "genres": 0.4, "themes": 0.4 }, "top_n": 12 }
//! ```

use crate::rank::{Ranker, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_TOP_N};
use crate::weights::WeightSet;
use animatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub weights: WeightSet,
    pub top_n: usize,
    /// Rescale weights to sum to 1.0 before scoring
    pub normalize_weights: bool,
    pub parallel_threshold: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: WeightSet::default(),
            top_n: DEFAULT_TOP_N,
            normalize_weights: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl RankingConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RankingConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        if self.normalize_weights && self.weights.total() <= 0.0 {
            return Err(Error::InvalidInput(
                "normalize_weights requires at least one positive weight".to_string(),
            ));
        }
        Ok(())
    }

    /// Weights as they will be applied
    pub fn effective_weights(&self) -> Result<WeightSet> {
        if self.normalize_weights {
            self.weights.normalized()
        } else {
            self.weights.validate()?;
            Ok(self.weights.clone())
        }
    }

    pub fn ranker(&self) -> Result<Ranker> {
        Ok(Ranker::new(self.effective_weights()?)?.with_parallel_threshold(self.parallel_threshold))
    }
}
