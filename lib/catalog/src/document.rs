//! Upstream anime documents
//!
//! The document store keeps display features and embeddings in separate
//! collections keyed by `anime_id`. Field names follow the store's own
//! capitalization, hence the serde renames.

use animatch_core::{EmbeddedItem, EmbeddingField, Embeddings, ItemId, Vector};
use serde::{Deserialize, Serialize};

/// Title used when a document has no usable name at all
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// One record from either the features or the embeddings collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeDocument {
    pub anime_id: ItemId,

    #[serde(rename = "English", default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(rename = "Japanese", default, skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,
    #[serde(rename = "Synonyms", default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Genres", default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(rename = "Themes", default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,
    #[serde(rename = "Demographic", default, skip_serializing_if = "Option::is_none")]
    pub demographic: Option<Vec<String>>,
    #[serde(rename = "Rating", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "Studios", default, skip_serializing_if = "Option::is_none")]
    pub studios: Option<Vec<String>>,

    #[serde(rename = "Score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "Popularity", default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(rename = "Rank", default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bert_description: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bert_genres: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bert_demographic: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bert_rating: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bert_themes: Option<Vec<f32>>,
}

impl AnimeDocument {
    pub fn new(anime_id: ItemId) -> Self {
        Self {
            anime_id,
            ..Default::default()
        }
    }

    /// First non-blank of English, Synonyms, Japanese, then `title`
    pub fn display_name(&self) -> Option<&str> {
        [&self.english, &self.synonyms, &self.japanese, &self.title]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .map(str::trim)
            .find(|name| !name.is_empty())
    }

    pub fn embedding(&self, field: EmbeddingField) -> Option<&Vec<f32>> {
        match field {
            EmbeddingField::Description => self.bert_description.as_ref(),
            EmbeddingField::Genres => self.bert_genres.as_ref(),
            EmbeddingField::Demographic => self.bert_demographic.as_ref(),
            EmbeddingField::Rating => self.bert_rating.as_ref(),
            EmbeddingField::Themes => self.bert_themes.as_ref(),
        }
    }

    /// Embeddings from this document, field by field
    pub fn embeddings(&self) -> Embeddings {
        let mut embeddings = Embeddings::default();
        for field in EmbeddingField::ALL {
            embeddings.set(field, self.embedding(field).map(|data| Vector::from_slice(data)));
        }
        embeddings
    }
}

/// Display metadata the presentation layer joins back onto ranked ids
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemMetadata {
    pub id: ItemId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
}

/// Combine a features document with its (optional) embeddings document
///
/// Names are looked up on the features document first, then on the
/// embeddings document. Vectors come from the embeddings document, falling
/// back to any the features document carries itself.
pub fn merge_documents(
    features: &AnimeDocument,
    embeddings: Option<&AnimeDocument>,
) -> (EmbeddedItem, ItemMetadata) {
    let title = features
        .display_name()
        .or_else(|| embeddings.and_then(AnimeDocument::display_name))
        .unwrap_or(UNKNOWN_TITLE)
        .to_string();

    let mut vectors = Embeddings::default();
    for field in EmbeddingField::ALL {
        let data = embeddings
            .and_then(|doc| doc.embedding(field))
            .or_else(|| features.embedding(field));
        vectors.set(field, data.map(|data| Vector::from_slice(data)));
    }

    let item = EmbeddedItem {
        id: features.anime_id,
        title: title.clone(),
        embeddings: vectors,
    };
    let metadata = ItemMetadata {
        id: features.anime_id,
        title,
        image_url: features.image_url.clone(),
        description: features.description.clone(),
        genres: features.genres.clone().unwrap_or_default(),
        score: features.score,
        popularity: features.popularity,
        rank: features.rank,
    };

    (item, metadata)
}
