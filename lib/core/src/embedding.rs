//! Embedding provider seam
//!
//! The ranking core never looks at pixels. It asks an [`EmbeddingProvider`]
//! for a fixed-length vector and ranks that. The production backend (a
//! vision transformer) lives outside this workspace and plugs in through the
//! trait; [`ShingleEmbedder`] is a deterministic stand-in that needs no model
//! weights, and [`StaticEmbedder`] returns canned vectors for tests.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;
use crate::{Error, Result, Vector};

/// Failures reported by an embedding backend
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("No image provided.")]
    EmptyImage,

    #[error("An error occurred while processing the uploaded file: {0}")]
    Processing(String),

    #[error("Embedding backend returned {actual} dimensions, expected {expected}")]
    UnexpectedDimension { expected: usize, actual: usize },
}

/// Turns an encoded image into a feature vector.
///
/// Implementations must be deterministic: the same bytes always produce the
/// same vector, otherwise rankings are not reproducible.
pub trait EmbeddingProvider: Send + Sync {
    /// Length of every vector returned by [`Self::embed`]
    fn dim(&self) -> usize;

    fn embed(&self, image: &[u8]) -> std::result::Result<Vector, EmbeddingError>;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<P> {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn embed(&self, image: &[u8]) -> std::result::Result<Vector, EmbeddingError> {
        (**self).embed(image)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn embed(&self, image: &[u8]) -> std::result::Result<Vector, EmbeddingError> {
        (**self).embed(image)
    }
}

/// Width of the ViT-base hidden state the dataset was built with
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

const DEFAULT_SHINGLE_LEN: usize = 4;

/// Feature-hashing embedder over overlapping byte shingles.
///
/// Each window of `shingle_len` bytes is hashed to a bucket and a sign, the
/// buckets are summed and the result is scaled to unit length. Identical
/// files map to identical vectors and files sharing long byte runs land
/// close together. It knows nothing about image content.
#[derive(Debug, Clone)]
pub struct ShingleEmbedder {
    dim: usize,
    shingle_len: usize,
}

impl ShingleEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        Self::with_shingle_len(dim, DEFAULT_SHINGLE_LEN)
    }

    pub fn with_shingle_len(dim: usize, shingle_len: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig("embedding dimension must be at least 1".to_string()));
        }
        if shingle_len == 0 {
            return Err(Error::InvalidConfig("shingle length must be at least 1".to_string()));
        }
        Ok(Self { dim, shingle_len })
    }

    fn bucket(&self, shingle: &[u8]) -> (usize, f32) {
        let mut hasher = DefaultHasher::new();
        shingle.hash(&mut hasher);
        let hash = hasher.finish();
        let pos = (hash % self.dim as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        (pos, sign)
    }
}

impl EmbeddingProvider for ShingleEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, image: &[u8]) -> std::result::Result<Vector, EmbeddingError> {
        if image.is_empty() {
            return Err(EmbeddingError::EmptyImage);
        }

        let mut buckets = vec![0.0f32; self.dim];
        if image.len() < self.shingle_len {
            let (pos, sign) = self.bucket(image);
            buckets[pos] += sign;
        } else {
            for shingle in image.windows(self.shingle_len) {
                let (pos, sign) = self.bucket(shingle);
                buckets[pos] += sign;
            }
        }

        let mut vector = Vector::new(buckets);
        vector.normalize();
        Ok(vector)
    }
}

/// Returns canned vectors keyed by the exact input bytes
#[derive(Debug, Clone, Default)]
pub struct StaticEmbedder {
    dim: usize,
    vectors: HashMap<Vec<u8>, Vector>,
}

impl StaticEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, image: impl Into<Vec<u8>>, vector: Vector) -> Self {
        self.vectors.insert(image.into(), vector);
        self
    }
}

impl EmbeddingProvider for StaticEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, image: &[u8]) -> std::result::Result<Vector, EmbeddingError> {
        if image.is_empty() {
            return Err(EmbeddingError::EmptyImage);
        }
        let vector = self
            .vectors
            .get(image)
            .cloned()
            .ok_or_else(|| EmbeddingError::Processing("cannot identify image file".to_string()))?;
        if vector.dim() != self.dim {
            return Err(EmbeddingError::UnexpectedDimension {
                expected: self.dim,
                actual: vector.dim(),
            });
        }
        Ok(vector)
    }
}
