//! # animatch Catalog
//!
//! Turns document-store exports into the in-memory catalog the ranking
//! engine consumes.
//!
//! - [`AnimeDocument`] - Raw record from the features or embeddings collection
//! - [`Catalog`] - Deduplicated items plus display metadata, indexed by id
//! - [`SortKey`] - Catalog ordering (popularity, score, rank)

pub mod catalog;
pub mod document;

pub use catalog::{Catalog, SortKey};
pub use document::{merge_documents, AnimeDocument, ItemMetadata, UNKNOWN_TITLE};
