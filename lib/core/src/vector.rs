use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::simd::{cosine_parts_simd, CosineParts};

// Squared norms below this lose most of their precision to subnormals
const MIN_NORM_SQ: f32 = 1.0e-30;

/// A dense embedding vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    /// Cosine similarity in `[-1, 1]`
    ///
    /// An empty or zero-length vector on either side scores `0.0`; that is a
    /// scoring policy, not an error. Vectors of different dimension fail with
    /// [`Error::InvalidDimension`], and a NaN or infinite component fails with
    /// [`Error::InvalidInput`].
    ///
    /// Very small or very large magnitudes are handled: when the f32 sums
    /// underflow or overflow, each side is rescaled by its largest component
    /// and the sums are taken again.
    pub fn cosine_similarity(&self, other: &Vector) -> Result<f32> {
        if self.is_empty() || other.is_empty() {
            return Ok(0.0);
        }
        if self.dim() != other.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: other.dim(),
            });
        }

        let mut parts = cosine_parts_simd(&self.data, &other.data);
        if !sums_in_range(&parts) {
            let (Some(a), Some(b)) = (unit_scaled(&self.data)?, unit_scaled(&other.data)?) else {
                return Ok(0.0);
            };
            parts = cosine_parts_simd(&a, &b);
        }

        // Rounding can push identical directions a hair past 1.0
        Ok(parts.cosine().clamp(-1.0, 1.0))
    }

    /// Element-wise arithmetic mean of a set of vectors
    ///
    /// Returns `None` when `vectors` yields nothing.
    pub fn mean<'a, I>(vectors: I) -> Result<Option<Vector>>
    where
        I: IntoIterator<Item = &'a Vector>,
    {
        let mut sum: Option<Vec<f32>> = None;
        let mut count = 0usize;

        for v in vectors {
            match sum.as_mut() {
                None => sum = Some(v.data.clone()),
                Some(acc) => {
                    if acc.len() != v.dim() {
                        return Err(Error::InvalidDimension {
                            expected: acc.len(),
                            actual: v.dim(),
                        });
                    }
                    for (a, x) in acc.iter_mut().zip(&v.data) {
                        *a += x;
                    }
                }
            }
            count += 1;
        }

        Ok(sum.map(|mut acc| {
            let inv = 1.0 / count as f32;
            for a in &mut acc {
                *a *= inv;
            }
            Vector::new(acc)
        }))
    }
}

fn sums_in_range(parts: &CosineParts) -> bool {
    parts.dot.is_finite()
        && parts.norm_sq_a.is_finite()
        && parts.norm_sq_b.is_finite()
        && parts.norm_sq_a >= MIN_NORM_SQ
        && parts.norm_sq_b >= MIN_NORM_SQ
}

/// Copy of `data` divided by its largest absolute component
///
/// `None` for an all-zero slice.
fn unit_scaled(data: &[f32]) -> Result<Option<Vec<f32>>> {
    let mut max = 0.0f32;
    for x in data {
        if !x.is_finite() {
            return Err(Error::InvalidInput(
                "vector contains non-finite components".to_string(),
            ));
        }
        max = max.max(x.abs());
    }
    if max == 0.0 {
        return Ok(None);
    }
    Ok(Some(data.iter().map(|x| x / max).collect()))
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Vector::new(data)
    }
}
