//! # networth-core
//!
//! Ranking core for the net worth lookalike estimator.
//!
//! An uploaded photo is embedded by an [`EmbeddingProvider`], the vector is
//! compared against a small [`ProfileStore`] of precomputed celebrity
//! embeddings with cosine similarity, and the net worth of the best matches
//! is averaged.
//!
//! - [`Vector`] - Dense embedding with SIMD dot product and norm
//! - [`Profile`] / [`ProfileStore`] - The validated, read-only subject table
//! - [`SimilarityRanker`] - Threshold filter + stable top-K over cosine scores
//! - [`estimate()`] - Unweighted mean of matched net worths
//! - [`NetWorthPipeline`] - image -> embedding -> matches -> estimate
//!
//! ## Example
//!
//! ```rust
//! use networth_core::{estimate, rank, Profile, ProfileStore, Vector};
//!
//! let store = ProfileStore::new(vec![
//!     Profile::new("A", 100.0, "a.jpg", Vector::new(vec![1.0, 0.0])),
//!     Profile::new("B", 300.0, "b.jpg", Vector::new(vec![0.0, 1.0])),
//! ])
//! .unwrap();
//!
//! let matches = rank(&Vector::new(vec![1.0, 0.0]), &store, Some(0.0), 3).unwrap();
//! assert_eq!(matches[0].profile.name, "A");
//! assert_eq!(estimate(&matches), Some(200.0));
//! ```

pub mod vector;
pub mod error;
pub mod profile;
pub mod store;
pub mod ranker;
pub mod estimate;
pub mod embedding;
pub mod pipeline;

/// SIMD-optimized dot product and norm
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
pub mod simd;

pub use vector::Vector;
pub use error::{Error, Result};
pub use profile::Profile;
pub use store::{ProfileStore, StoreValidationError};
pub use ranker::{rank, Match, RankerConfig, SimilarityRanker, DEFAULT_TOP_K};
pub use estimate::estimate;
pub use embedding::{
    EmbeddingError, EmbeddingProvider, ShingleEmbedder, StaticEmbedder, DEFAULT_EMBEDDING_DIM,
};
pub use pipeline::{Estimation, NetWorthPipeline};
