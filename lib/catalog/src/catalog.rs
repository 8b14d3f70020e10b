use crate::document::{merge_documents, AnimeDocument, ItemMetadata};
use ahash::AHashMap;
use animatch_core::{EmbeddedItem, EmbeddingField, Error, ItemId, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Catalog ordering
///
/// Order matters: equal-score candidates keep catalog order in the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Ascending; 1 is the most popular
    #[default]
    Popularity,
    /// Descending
    Score,
    /// Ascending
    Rank,
}

impl SortKey {
    fn value(&self, metadata: &ItemMetadata) -> Option<f64> {
        match self {
            SortKey::Popularity => metadata.popularity,
            SortKey::Score => metadata.score,
            SortKey::Rank => metadata.rank,
        }
    }

    /// Items without a value sort after every item with one
    fn compare(&self, a: &ItemMetadata, b: &ItemMetadata) -> Ordering {
        match (self.value(a), self.value(b)) {
            (Some(x), Some(y)) => match self {
                SortKey::Score => y.total_cmp(&x),
                SortKey::Popularity | SortKey::Rank => x.total_cmp(&y),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popularity" => Ok(SortKey::Popularity),
            "score" => Ok(SortKey::Score),
            "rank" => Ok(SortKey::Rank),
            other => Err(Error::InvalidInput(format!("unknown sort key '{}'", other))),
        }
    }
}

/// In-memory catalog: embedded items for ranking plus display metadata
///
/// `items()` and `metadata()` are index-aligned and deduplicated by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<EmbeddedItem>,
    metadata: Vec<ItemMetadata>,
    index: AHashMap<ItemId, usize>,
}

impl Catalog {
    /// Build from already-merged documents
    pub fn from_documents(documents: Vec<AnimeDocument>) -> Self {
        let entries = documents
            .iter()
            .map(|doc| merge_documents(doc, None))
            .collect();
        Self::from_entries(entries)
    }

    /// Join feature documents with embedding documents by id
    ///
    /// The result follows feature order. Features without an embeddings
    /// document keep whatever vectors they carry (usually none), and
    /// embedding documents without a feature are dropped.
    pub fn merge(features: Vec<AnimeDocument>, embeddings: Vec<AnimeDocument>) -> Self {
        let mut by_id: AHashMap<ItemId, AnimeDocument> = AHashMap::with_capacity(embeddings.len());
        for doc in embeddings {
            by_id.entry(doc.anime_id).or_insert(doc);
        }

        let unmatched = features
            .iter()
            .filter(|f| !by_id.contains_key(&f.anime_id))
            .count();
        if unmatched > 0 {
            debug!(unmatched, "features without an embeddings document");
        }

        let entries = features
            .iter()
            .map(|f| merge_documents(f, by_id.get(&f.anime_id)))
            .collect();
        Self::from_entries(entries)
    }

    /// Build from items the caller assembled directly
    pub fn from_items(items: Vec<EmbeddedItem>) -> Self {
        let entries = items
            .into_iter()
            .map(|item| {
                let metadata = ItemMetadata {
                    id: item.id,
                    title: item.title.clone(),
                    ..Default::default()
                };
                (item, metadata)
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Load a JSON array of merged documents
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let documents = read_documents(path.as_ref())?;
        let catalog = Self::from_documents(documents);
        info!(items = catalog.len(), path = %path.as_ref().display(), "catalog loaded");
        Ok(catalog)
    }

    /// Load separate features and embeddings exports and merge them
    pub fn from_json_files<P: AsRef<Path>, Q: AsRef<Path>>(features: P, embeddings: Q) -> Result<Self> {
        let catalog = Self::merge(
            read_documents(features.as_ref())?,
            read_documents(embeddings.as_ref())?,
        );
        info!(items = catalog.len(), "catalog merged from features and embeddings");
        Ok(catalog)
    }

    fn from_entries(entries: Vec<(EmbeddedItem, ItemMetadata)>) -> Self {
        let mut catalog = Catalog {
            items: Vec::with_capacity(entries.len()),
            metadata: Vec::with_capacity(entries.len()),
            index: AHashMap::with_capacity(entries.len()),
        };

        for (item, metadata) in entries {
            if catalog.index.contains_key(&item.id) {
                warn!(id = item.id, "duplicate catalog id, keeping first occurrence");
                continue;
            }
            catalog.index.insert(item.id, catalog.items.len());
            catalog.items.push(item);
            catalog.metadata.push(metadata);
        }

        catalog
    }

    /// Reorder by `key`; ties and missing values keep their current order
    pub fn sort_by(&mut self, key: SortKey) {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by(|&a, &b| key.compare(&self.metadata[a], &self.metadata[b]));

        let mut items: Vec<Option<EmbeddedItem>> = self.items.drain(..).map(Some).collect();
        let mut metadata: Vec<Option<ItemMetadata>> = self.metadata.drain(..).map(Some).collect();

        for i in order {
            if let (Some(item), Some(meta)) = (items[i].take(), metadata[i].take()) {
                self.items.push(item);
                self.metadata.push(meta);
            }
        }
        self.reindex();
    }

    #[must_use]
    pub fn sorted(mut self, key: SortKey) -> Self {
        self.sort_by(key);
        self
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, item) in self.items.iter().enumerate() {
            self.index.insert(item.id, pos);
        }
    }

    /// Check that every non-empty vector of a field has the same dimension
    pub fn validate_dimensions(&self) -> Result<()> {
        for field in EmbeddingField::ALL {
            let mut expected: Option<usize> = None;
            for item in &self.items {
                let Some(vector) = item.embeddings.non_empty(field) else {
                    continue;
                };
                match expected {
                    None => expected = Some(vector.dim()),
                    Some(dim) if dim != vector.dim() => {
                        return Err(Error::FieldDimension {
                            field,
                            expected: dim,
                            actual: vector.dim(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    pub fn items(&self) -> &[EmbeddedItem] {
        &self.items
    }

    pub fn metadata(&self) -> &[ItemMetadata] {
        &self.metadata
    }

    pub fn get(&self, id: ItemId) -> Option<&EmbeddedItem> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    /// Display metadata for a ranked id
    pub fn metadata_for(&self, id: ItemId) -> Option<&ItemMetadata> {
        self.index.get(&id).map(|&pos| &self.metadata[pos])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<EmbeddedItem> {
        self.items
    }
}

impl AsRef<[EmbeddedItem]> for Catalog {
    fn as_ref(&self) -> &[EmbeddedItem] {
        &self.items
    }
}

fn read_documents(path: &Path) -> Result<Vec<AnimeDocument>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
