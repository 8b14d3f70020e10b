use thiserror::Error;

use crate::item::{EmbeddingField, ItemId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("None of the selected items were found in the catalog: {ids:?}")]
    NotFound { ids: Vec<ItemId> },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Invalid vector dimension for field '{field}': expected {expected}, got {actual}")]
    FieldDimension {
        field: EmbeddingField,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid weight for field '{field}': {weight}")]
    InvalidWeight { field: EmbeddingField, weight: f32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No selected item could be resolved; show an empty state
    NotFound,
    /// Malformed vectors or weights
    InvalidInput,
    /// Catalog could not be read or decoded
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::InvalidDimension { .. }
            | Error::FieldDimension { .. }
            | Error::InvalidWeight { .. }
            | Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Io(_) | Error::Serialization(_) => ErrorKind::Io,
        }
    }

    /// Attach the field name to a bare dimension mismatch
    pub fn in_field(self, field: EmbeddingField) -> Self {
        match self {
            Error::InvalidDimension { expected, actual } => Error::FieldDimension {
                field,
                expected,
                actual,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::NotFound { ids: vec![7] }.kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::InvalidWeight { field: EmbeddingField::Genres, weight: -1.0 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            Error::Serialization("eof".to_string()).kind(),
            ErrorKind::Io
        );
    }

    #[test]
    fn test_in_field_wraps_dimension_error() {
        let err = Error::InvalidDimension { expected: 3, actual: 2 }.in_field(EmbeddingField::Themes);
        assert!(matches!(
            err,
            Error::FieldDimension { field: EmbeddingField::Themes, expected: 3, actual: 2 }
        ));
        assert_eq!(
            err.to_string(),
            "Invalid vector dimension for field 'themes': expected 3, got 2"
        );
    }
}
