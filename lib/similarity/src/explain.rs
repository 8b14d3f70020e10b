//! Explainability for ranked recommendations
//!
//! Output structures that show how each score was put together: weighted
//! per-field contributions plus the fields that had nothing to compare.

use crate::rank::RankedResult;
use crate::weights::WeightSet;
use animatch_core::{EmbeddingField, ItemId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A ranked item with its per-field score breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedResult {
    pub id: ItemId,
    /// Overall weighted similarity score
    pub score: f32,
    /// Per-field contributions (already weighted)
    pub explain: BTreeMap<EmbeddingField, f32>,
    /// Fields missing on the reference or the candidate
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub absent: Vec<EmbeddingField>,
}

impl ExplainedResult {
    pub fn from_ranked(ranked: &RankedResult, weights: &WeightSet) -> Self {
        let explain = ranked
            .field_scores
            .iter()
            .map(|(field, s)| (*field, weights.get(*field) * s.value()))
            .collect();
        let absent = ranked
            .field_scores
            .iter()
            .filter(|(_, s)| s.is_absent())
            .map(|(field, _)| *field)
            .collect();

        Self {
            id: ranked.id,
            score: ranked.score,
            explain,
            absent,
        }
    }

    pub fn from_ranked_list(ranked_list: &[RankedResult], weights: &WeightSet) -> Vec<Self> {
        ranked_list
            .iter()
            .map(|r| Self::from_ranked(r, weights))
            .collect()
    }

    /// Field with the largest weighted contribution
    pub fn top_field(&self) -> Option<EmbeddingField> {
        self.explain
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(field, _)| *field)
    }
}

/// Response for a recommendation request
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    /// Ids the recommendations were computed for
    pub selected: Vec<ItemId>,
    pub result: Vec<ExplainedResult>,
    pub stats: SimilarityStats,
}

impl RecommendationResponse {
    pub fn from_ranked(
        selected: &[ItemId],
        ranked_list: &[RankedResult],
        weights: &WeightSet,
        candidates_count: usize,
    ) -> Self {
        let result = ExplainedResult::from_ranked_list(ranked_list, weights);
        let stats = SimilarityStats::compute(&result, candidates_count);
        Self {
            selected: selected.to_vec(),
            result,
            stats,
        }
    }
}

/// Summary statistics for a recommendation request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityStats {
    /// Number of candidates considered
    pub candidates_count: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Average score of results
    pub avg_score: f32,
    /// Score of best result
    pub best_score: f32,
    /// Field that contributed most to best result
    pub top_contributing_field: Option<EmbeddingField>,
}

impl SimilarityStats {
    /// Results must already be sorted best-first
    pub fn compute(results: &[ExplainedResult], candidates_count: usize) -> Self {
        let Some(best) = results.first() else {
            return Self {
                candidates_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_contributing_field: None,
            };
        };

        let avg_score = results.iter().map(|r| r.score).sum::<f32>() / results.len() as f32;

        Self {
            candidates_count,
            results_count: results.len(),
            avg_score,
            best_score: best.score,
            top_contributing_field: best.top_field(),
        }
    }
}
