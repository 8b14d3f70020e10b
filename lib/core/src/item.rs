//! Catalog items and their per-field embeddings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::vector::Vector;

/// Externally assigned, stable item identifier
pub type ItemId = u64;

/// The named embedding fields every item may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingField {
    #[serde(alias = "bert_description")]
    Description,
    #[serde(alias = "bert_genres")]
    Genres,
    #[serde(alias = "bert_demographic")]
    Demographic,
    #[serde(alias = "bert_rating")]
    Rating,
    #[serde(alias = "bert_themes")]
    Themes,
}

impl EmbeddingField {
    /// All fields in canonical order
    pub const ALL: [EmbeddingField; 5] = [
        EmbeddingField::Description,
        EmbeddingField::Genres,
        EmbeddingField::Demographic,
        EmbeddingField::Rating,
        EmbeddingField::Themes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingField::Description => "description",
            EmbeddingField::Genres => "genres",
            EmbeddingField::Demographic => "demographic",
            EmbeddingField::Rating => "rating",
            EmbeddingField::Themes => "themes",
        }
    }
}

impl fmt::Display for EmbeddingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.strip_prefix("bert_").unwrap_or(&name);
        EmbeddingField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| Error::InvalidInput(format!("unknown embedding field '{}'", s)))
    }
}

/// One optional vector per named field
///
/// `None` means the loader delivered nothing for that field. `Some` with an
/// empty vector means it delivered an empty array. Both contribute zero to a
/// score, but they stay distinguishable for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embeddings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vector>,
}

impl Embeddings {
    pub fn get(&self, field: EmbeddingField) -> Option<&Vector> {
        self.slot(field).as_ref()
    }

    pub fn set(&mut self, field: EmbeddingField, vector: Option<Vector>) {
        *self.slot_mut(field) = vector;
    }

    /// Vector for `field` only if it has at least one component
    pub fn non_empty(&self, field: EmbeddingField) -> Option<&Vector> {
        self.get(field).filter(|v| !v.is_empty())
    }

    /// Fields with no vector at all
    pub fn absent_fields(&self) -> Vec<EmbeddingField> {
        EmbeddingField::ALL
            .into_iter()
            .filter(|&field| self.get(field).is_none())
            .collect()
    }

    fn slot(&self, field: EmbeddingField) -> &Option<Vector> {
        match field {
            EmbeddingField::Description => &self.description,
            EmbeddingField::Genres => &self.genres,
            EmbeddingField::Demographic => &self.demographic,
            EmbeddingField::Rating => &self.rating,
            EmbeddingField::Themes => &self.themes,
        }
    }

    fn slot_mut(&mut self, field: EmbeddingField) -> &mut Option<Vector> {
        match field {
            EmbeddingField::Description => &mut self.description,
            EmbeddingField::Genres => &mut self.genres,
            EmbeddingField::Demographic => &mut self.demographic,
            EmbeddingField::Rating => &mut self.rating,
            EmbeddingField::Themes => &mut self.themes,
        }
    }
}

/// A catalog entry: identity, display title, and its embeddings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedItem {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub embeddings: Embeddings,
}

impl EmbeddedItem {
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            embeddings: Embeddings::default(),
        }
    }

    /// Builder-style setter for one field
    #[must_use]
    pub fn with_field(mut self, field: EmbeddingField, data: Vec<f32>) -> Self {
        self.embeddings.set(field, Some(Vector::new(data)));
        self
    }

    #[inline]
    pub fn field(&self, field: EmbeddingField) -> Option<&Vector> {
        self.embeddings.get(field)
    }
}
