//! # animatch Similarity
//!
//! Weighted multi-field similarity ranking for catalog items.
//!
//! Every item carries up to five embedding vectors (description, genres,
//! demographic, rating, themes). A candidate's score against the current
//! selection is the weighted sum of per-field cosine similarities.
//!
//! ## Features
//!
//! - **Weight Set**: per-field importance, plain sum by default
//! - **Reference Vector**: one selected item as-is, several averaged per field
//! - **Ranking**: selected items excluded, stable descending order, top-N cut
//! - **Parallel Scoring**: large catalogs are scored on the rayon pool
//! - **Explainability**: per-field contribution breakdown
//!
//! ## Example
//!
//! ```rust
//! use animatch_core::{EmbeddedItem, EmbeddingField};
//! use animatch_similarity::{rank, RankingRequest, WeightSet};
//!
//! let catalog = vec![
//!     EmbeddedItem::new(1, "Haikyuu!!").with_field(EmbeddingField::Genres, vec![1.0, 0.0]),
//!     EmbeddedItem::new(2, "Kuroko no Basket").with_field(EmbeddingField::Genres, vec![1.0, 0.0]),
//!     EmbeddedItem::new(3, "Mononoke").with_field(EmbeddingField::Genres, vec![0.0, 1.0]),
//! ];
//! let weights = WeightSet::only(EmbeddingField::Genres);
//!
//! let ranked = rank(&RankingRequest::new(&[1], &catalog, &weights).top_n(2)).unwrap();
//! assert_eq!(ranked[0].id, 2);
//! assert_eq!(ranked[1].id, 3);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Selection  │────>│  Reference  │────>│   Ranker    │<──── WeightSet
//! │    (ids)    │     │  (mean/id)  │     │ (candidates)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌─────────────┐
//!                                         │   Explain   │
//!                                         │  (results)  │
//!                                         └─────────────┘
//! ```

pub mod config;
pub mod explain;
pub mod rank;
pub mod reference;
pub mod weights;

// Re-export main types for convenience
pub use config::RankingConfig;
pub use explain::{ExplainedResult, RecommendationResponse, SimilarityStats};
pub use rank::{
    cosine_similarity, rank, score, FieldScore, RankedResult, Ranker, RankingRequest,
    ScoredCandidate, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_TOP_N,
};
pub use reference::compute_reference_vector;
pub use weights::WeightSet;
