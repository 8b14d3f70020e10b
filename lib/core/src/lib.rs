//! # animatch Core
//!
//! Core types for the animatch recommendation engine.
//!
//! - [`Vector`] - Dense embedding vector with SIMD cosine similarity
//! - [`EmbeddedItem`] - A catalog entry with one optional vector per [`EmbeddingField`]
//! - [`Error`] - Failure taxonomy shared by every animatch crate
//!
//! ## Example
//!
//! ```rust
//! use animatch_core::{EmbeddedItem, EmbeddingField};
//!
//! let a = EmbeddedItem::new(1, "Mushishi").with_field(EmbeddingField::Genres, vec![1.0, 0.0]);
//! let b = EmbeddedItem::new(2, "Natsume").with_field(EmbeddingField::Genres, vec![1.0, 0.0]);
//!
//! let genres_a = a.field(EmbeddingField::Genres).unwrap();
//! let genres_b = b.field(EmbeddingField::Genres).unwrap();
//! assert!((genres_a.cosine_similarity(genres_b).unwrap() - 1.0).abs() < 1e-6);
//! ```

pub mod error;
pub mod item;
pub mod vector;

/// SIMD-optimized kernels behind cosine similarity
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
/// - Unrolled scalar loop elsewhere
pub mod simd;

pub use error::{Error, ErrorKind, Result};
pub use item::{EmbeddedItem, EmbeddingField, Embeddings, ItemId};
pub use vector::Vector;
