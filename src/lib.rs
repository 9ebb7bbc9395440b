//! # networth
//!
//! Estimates a person's "net worth potential" from a photo.
//!
//! The photo is embedded, compared against a small table of precomputed
//! celebrity embeddings with cosine similarity, and the net worth of the top
//! matches is averaged.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! networth generate                 # one-off: embed ./Celebrity_Image/*.jpg
//! networth serve --http-port 8080
//! curl -F image=@me.jpg http://localhost:8080/estimate
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use networth::prelude::*;
//!
//! let store = ProfileStore::new(vec![
//!     Profile::new("A", 100.0, "a.jpg", Vector::new(vec![1.0, 0.0])),
//!     Profile::new("B", 300.0, "b.jpg", Vector::new(vec![0.0, 1.0])),
//! ])
//! .unwrap();
//!
//! let ranker = SimilarityRanker::new(RankerConfig { threshold: Some(0.0), top_k: 3 }).unwrap();
//! let matches = ranker.rank(&Vector::new(vec![1.0, 0.0]), &store).unwrap();
//! assert_eq!(matches.len(), 2);
//! assert_eq!(estimate(&matches), Some(200.0));
//! ```
//!
//! ## Crate Structure
//!
//! - `networth-core` - Vectors, profiles, the similarity ranker and estimator
//! - `networth-storage` - Dataset loading, generation and snapshot sharing
//! - `networth-api` - REST API and display formatting

// Re-export core types
pub use networth_core::{
    estimate, rank,
    Error, Result,
    Estimation, NetWorthPipeline,
    EmbeddingError, EmbeddingProvider, ShingleEmbedder, StaticEmbedder,
    Match, Profile, ProfileStore, RankerConfig, SimilarityRanker, Vector,
    DEFAULT_EMBEDDING_DIM, DEFAULT_TOP_K,
};

// Re-export storage
pub use networth_storage::{
    DatasetConfig, DatasetGenerator, GenerationReport, ProfileStoreLoader, SharedStore, Subject,
};

// Re-export API
pub use networth_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        estimate, rank,
        Error, Result,
        EmbeddingProvider, NetWorthPipeline,
        Match, Profile, ProfileStore, RankerConfig, SimilarityRanker, Vector,
        DatasetConfig, ProfileStoreLoader,
    };
}

/// SIMD-optimized vector operations
pub mod simd {
    pub use networth_core::simd::{dot_product_simd, norm_simd};
}
