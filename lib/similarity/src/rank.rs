//! Scoring and ranking
//!
//! Scores every catalog candidate against the reference built from the
//! selection, drops the selected items themselves, and returns the best
//! `top_n` in descending score order.

use crate::reference::{compute_reference_vector, dedup_ids};
use crate::weights::WeightSet;
use ahash::AHashSet;
use animatch_core::{EmbeddedItem, EmbeddingField, ItemId, Result, Vector};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

/// Candidate count at which scoring moves onto the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

/// Result size the recommendation pages ask for
pub const DEFAULT_TOP_N: usize = 30;

/// Output record: an item id and its weighted score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub id: ItemId,
    pub score: f32,
}

/// Outcome of comparing one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldScore {
    /// Reference or candidate had no vector for the field
    Absent,
    /// Cosine similarity (zero for empty or zero-length vectors)
    Similarity(f32),
}

impl FieldScore {
    #[inline]
    pub fn value(&self) -> f32 {
        match self {
            FieldScore::Absent => 0.0,
            FieldScore::Similarity(s) => *s,
        }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldScore::Absent)
    }
}

/// Result of ranking with per-field scores
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub id: ItemId,
    /// Overall weighted similarity score
    pub score: f32,
    /// Per-field outcome (unweighted) in canonical field order
    pub field_scores: Vec<(EmbeddingField, FieldScore)>,
}

impl RankedResult {
    pub fn candidate(&self) -> ScoredCandidate {
        ScoredCandidate {
            id: self.id,
            score: self.score,
        }
    }
}

/// Ephemeral input bundle for one ranking call
///
/// Everything is borrowed; ranking never mutates its inputs.
#[derive(Debug, Clone, Copy)]
pub struct RankingRequest<'a> {
    pub selected_ids: &'a [ItemId],
    pub catalog: &'a [EmbeddedItem],
    pub weights: &'a WeightSet,
    pub top_n: usize,
}

impl<'a> RankingRequest<'a> {
    pub fn new(
        selected_ids: &'a [ItemId],
        catalog: &'a [EmbeddedItem],
        weights: &'a WeightSet,
    ) -> Self {
        Self {
            selected_ids,
            catalog,
            weights,
            top_n: DEFAULT_TOP_N,
        }
    }

    #[must_use]
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Cosine similarity of two embedding vectors
///
/// Convenience form of [`Vector::cosine_similarity`].
pub fn cosine_similarity(a: &Vector, b: &Vector) -> Result<f32> {
    a.cosine_similarity(b)
}

/// Weighted sum of per-field cosine similarities
pub fn score(reference: &EmbeddedItem, candidate: &EmbeddedItem, weights: &WeightSet) -> Result<f32> {
    Ok(score_fields(reference, candidate, weights)?.0)
}

/// Rank `request.catalog` against the selection
///
/// See [`Ranker::rank`].
pub fn rank(request: &RankingRequest<'_>) -> Result<Vec<ScoredCandidate>> {
    Ranker::new(request.weights.clone())?.rank(request.selected_ids, request.catalog, request.top_n)
}

fn score_fields(
    reference: &EmbeddedItem,
    candidate: &EmbeddedItem,
    weights: &WeightSet,
) -> Result<(f32, Vec<(EmbeddingField, FieldScore)>)> {
    let mut total_score = 0.0f32;
    let mut field_scores = Vec::with_capacity(EmbeddingField::ALL.len());

    for field in EmbeddingField::ALL {
        let field_score = match (reference.field(field), candidate.field(field)) {
            (Some(r), Some(c)) => {
                FieldScore::Similarity(r.cosine_similarity(c).map_err(|err| err.in_field(field))?)
            }
            _ => FieldScore::Absent,
        };

        total_score += weights.get(field) * field_score.value();
        field_scores.push((field, field_score));
    }

    Ok((total_score, field_scores))
}

/// Ranking engine bound to a validated weight set
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: WeightSet,
    parallel_threshold: usize,
}

impl Ranker {
    /// Create a ranker; fails on negative or NaN weights
    pub fn new(weights: WeightSet) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            weights,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Candidate count at which scoring fans out across threads
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// A new ranker with some weights replaced
    pub fn with_weights(
        &self,
        overrides: &std::collections::BTreeMap<EmbeddingField, f32>,
    ) -> Result<Ranker> {
        Ok(Ranker {
            weights: self.weights.with_overrides(overrides)?,
            parallel_threshold: self.parallel_threshold,
        })
    }

    pub fn score(&self, reference: &EmbeddedItem, candidate: &EmbeddedItem) -> Result<f32> {
        score(reference, candidate, &self.weights)
    }

    /// Score plus the per-field breakdown
    pub fn score_detailed(
        &self,
        reference: &EmbeddedItem,
        candidate: &EmbeddedItem,
    ) -> Result<RankedResult> {
        let (score, field_scores) = score_fields(reference, candidate, &self.weights)?;
        Ok(RankedResult {
            id: candidate.id,
            score,
            field_scores,
        })
    }

    /// Top `top_n` candidates by descending score
    ///
    /// Selected items never appear in the output. Equal scores keep their
    /// catalog order. Fewer than `top_n` remaining candidates, or none at all,
    /// just shortens the result.
    pub fn rank(
        &self,
        selected_ids: &[ItemId],
        catalog: &[EmbeddedItem],
        top_n: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        Ok(self
            .rank_explained(selected_ids, catalog, top_n)?
            .iter()
            .map(RankedResult::candidate)
            .collect())
    }

    /// Same as [`rank`](Self::rank) but keeps per-field scores
    pub fn rank_explained(
        &self,
        selected_ids: &[ItemId],
        catalog: &[EmbeddedItem],
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        let reference = compute_reference_vector(selected_ids, catalog)?;
        let excluded: AHashSet<ItemId> = dedup_ids(selected_ids).into_iter().collect();

        let candidates: Vec<&EmbeddedItem> = catalog
            .iter()
            .filter(|item| !excluded.contains(&item.id))
            .collect();

        debug!(
            catalog = catalog.len(),
            selected = excluded.len(),
            candidates = candidates.len(),
            top_n,
            "ranking candidates"
        );

        // Both paths yield results in catalog order
        let mut results: Vec<RankedResult> = if candidates.len() >= self.parallel_threshold {
            candidates
                .par_iter()
                .map(|candidate| self.score_detailed(&reference, candidate))
                .collect::<Result<Vec<_>>>()?
        } else {
            candidates
                .iter()
                .map(|candidate| self.score_detailed(&reference, candidate))
                .collect::<Result<Vec<_>>>()?
        };

        trace!(
            absent = results
                .iter()
                .flat_map(|r| r.field_scores.iter())
                .filter(|(_, s)| s.is_absent())
                .count(),
            "absent field comparisons"
        );

        // Stable sort keeps catalog order for ties
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_n);

        Ok(results)
    }
}
