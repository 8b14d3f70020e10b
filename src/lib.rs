//! # animatch
//!
//! Anime recommendations from precomputed embeddings.
//!
//! Each catalog item carries up to five embedding vectors (description,
//! genres, demographic, rating, themes). Given one or more selected items,
//! animatch scores every other item by the weighted sum of per-field cosine
//! similarities and returns the best matches.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! animatch --catalog anime.json --select 5114 --select 9253 --top-n 10
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use animatch::prelude::*;
//!
//! let catalog = vec![
//!     EmbeddedItem::new(1, "Mob Psycho 100").with_field(EmbeddingField::Genres, vec![1.0, 0.0]),
//!     EmbeddedItem::new(2, "One Punch Man").with_field(EmbeddingField::Genres, vec![1.0, 0.0]),
//!     EmbeddedItem::new(3, "Aria").with_field(EmbeddingField::Genres, vec![0.0, 1.0]),
//! ];
//!
//! let ranker = Ranker::new(WeightSet::default()).unwrap();
//! let ranked = ranker.rank(&[1], &catalog, 30).unwrap();
//! assert_eq!(ranked[0].id, 2);
//! ```
//!
//! ## Crate Structure
//!
//! - `animatch-core` - Vector, EmbeddedItem, SIMD kernels, error taxonomy
//! - `animatch-similarity` - Weights, reference vectors, scoring, ranking, explanations
//! - `animatch-catalog` - Document decoding, feature/embedding merge, catalog ordering

use std::sync::Arc;

// Re-export core types
pub use animatch_core::{
    EmbeddedItem, EmbeddingField, Embeddings, Error, ErrorKind, ItemId, Result, Vector,
};

// Re-export the ranking engine
pub use animatch_similarity::{
    compute_reference_vector, cosine_similarity, rank, score, ExplainedResult, FieldScore,
    RankedResult, Ranker, RankingConfig, RankingRequest, RecommendationResponse, ScoredCandidate,
    SimilarityStats, WeightSet, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_TOP_N,
};

// Re-export the catalog loader
pub use animatch_catalog::{AnimeDocument, Catalog, ItemMetadata, SortKey, UNKNOWN_TITLE};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, EmbeddedItem, EmbeddingField, Error, ErrorKind, ItemId, Ranker, RankingConfig,
        RankingRequest, Result, ScoredCandidate, SortKey, Vector, WeightSet,
    };
}

/// SIMD-optimized vector operations
pub mod simd {
    pub use animatch_core::simd::{cosine_parts_simd, CosineParts};
}

/// Rank on tokio's blocking pool, keeping per-field scores
///
/// Scoring is CPU-bound, so it runs off the async workers. The catalog is
/// shared, never copied. Errors from ranking come back as
/// [`Error`](animatch_core::Error) inside the `anyhow::Error`.
pub async fn rank_explained_async<C>(
    ranker: Ranker,
    selected_ids: Vec<ItemId>,
    catalog: Arc<C>,
    top_n: usize,
) -> anyhow::Result<Vec<RankedResult>>
where
    C: AsRef<[EmbeddedItem]> + Send + Sync + 'static,
{
    let ranked = tokio::task::spawn_blocking(move || {
        let items: &[EmbeddedItem] = (*catalog).as_ref();
        ranker.rank_explained(&selected_ids, items, top_n)
    })
    .await??;
    Ok(ranked)
}

/// Async form of [`Ranker::rank`]
pub async fn rank_async<C>(
    ranker: Ranker,
    selected_ids: Vec<ItemId>,
    catalog: Arc<C>,
    top_n: usize,
) -> anyhow::Result<Vec<ScoredCandidate>>
where
    C: AsRef<[EmbeddedItem]> + Send + Sync + 'static,
{
    let ranked = rank_explained_async(ranker, selected_ids, catalog, top_n).await?;
    Ok(ranked.iter().map(RankedResult::candidate).collect())
}
