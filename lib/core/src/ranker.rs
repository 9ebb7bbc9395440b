use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::vector::cosine_with_norms;
use crate::{Error, Profile, ProfileStore, Result, Vector};

/// Stores at least this large are scored on the rayon pool
const PARALLEL_SCORING_MIN: usize = 4096;

pub const DEFAULT_TOP_K: usize = 3;

/// Ranking knobs passed in at construction time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Inclusive lower bound on the score; `None` keeps everything
    #[serde(default)]
    pub threshold: Option<f32>,
    /// Maximum number of matches returned
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RankerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".to_string()));
        }
        if let Some(threshold) = self.threshold {
            if threshold.is_nan() {
                return Err(Error::InvalidConfig("threshold must be a number".to_string()));
            }
        }
        Ok(())
    }
}

/// A profile paired with its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub profile: &'a Profile,
    pub score: f32,
}

/// Brute-force cosine ranker over a [`ProfileStore`]
#[derive(Debug, Clone)]
pub struct SimilarityRanker {
    config: RankerConfig,
}

impl SimilarityRanker {
    pub fn new(config: RankerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    pub fn rank<'s>(&self, query: &Vector, store: &'s ProfileStore) -> Result<Vec<Match<'s>>> {
        rank(query, store, self.config.threshold, self.config.top_k)
    }
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self {
            config: RankerConfig::default(),
        }
    }
}

/// Rank every profile in `store` by cosine similarity to `query`.
///
/// Matches scoring below `threshold` are dropped, the rest are sorted by
/// score descending with ties left in store order, and at most `k` are
/// returned. An empty store always yields an empty result.
pub fn rank<'s>(
    query: &Vector,
    store: &'s ProfileStore,
    threshold: Option<f32>,
    k: usize,
) -> Result<Vec<Match<'s>>> {
    if store.is_empty() {
        return Ok(Vec::new());
    }
    if query.dim() != store.dim() {
        return Err(Error::DimensionMismatch {
            expected: store.dim(),
            actual: query.dim(),
        });
    }

    let scores = score_all(query, store);

    let mut matches: Vec<Match<'s>> = store
        .profiles()
        .iter()
        .zip(scores)
        .filter(|(_, score)| passes(*score, threshold))
        .map(|(profile, score)| Match { profile, score })
        .collect();

    // NaN scores were filtered above, so partial_cmp is total here.
    // sort_by is stable: equal scores keep store order.
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(k);
    Ok(matches)
}

/// Cosine score per profile, index-aligned with the store
fn score_all(query: &Vector, store: &ProfileStore) -> Vec<f32> {
    let query_norm = query.norm();
    let score = |(profile, norm): (&Profile, &f64)| {
        cosine_with_norms(query.dot(&profile.embedding), query_norm, *norm)
    };

    if store.len() >= PARALLEL_SCORING_MIN {
        store
            .profiles()
            .par_iter()
            .zip(store.norms().par_iter())
            .map(score)
            .collect()
    } else {
        store
            .profiles()
            .iter()
            .zip(store.norms().iter())
            .map(score)
            .collect()
    }
}

#[inline]
fn passes(score: f32, threshold: Option<f32>) -> bool {
    match threshold {
        Some(min) => score >= min,
        None => !score.is_nan(),
    }
}
