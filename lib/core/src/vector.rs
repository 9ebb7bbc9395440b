use serde::{Deserialize, Serialize};

/// A dense embedding of `f32` components.
///
/// Serializes as a bare JSON array so dataset files stay readable.
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
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
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

    /// Euclidean length, computed in f64 so it neither overflows nor
    /// underflows for finite components
    #[inline]
    pub fn norm(&self) -> f64 {
        crate::simd::norm_simd(&self.data)
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        crate::simd::dot_product_simd(&self.data, &other.data)
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Cosine similarity with another vector.
    ///
    /// A zero-length vector on either side scores 0.0 instead of dividing by
    /// zero. Mismatched dimensions also score 0.0; the ranker rejects those
    /// before scoring.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }
        cosine_with_norms(self.dot(other), self.norm(), other.norm())
    }

    /// Scale to unit length in place; zero vectors are left untouched
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            let inv = 1.0 / norm;
            for x in &mut self.data {
                *x = (*x as f64 * inv) as f32;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Cosine from a precomputed dot product and the two norms.
///
/// Everything stays in f64 until the final score; the denominator is zero
/// only when one of the vectors is exactly zero.
#[inline]
pub(crate) fn cosine_with_norms(dot: f64, norm_a: f64, norm_b: f64) -> f32 {
    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return 0.0;
    }
    (dot / denom) as f32
}
