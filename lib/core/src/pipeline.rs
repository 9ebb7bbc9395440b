use tracing::debug;
use crate::{estimate, EmbeddingProvider, Match, ProfileStore, RankerConfig, Result, SimilarityRanker, Vector};

/// Ranked matches plus the averaged net worth for one query
#[derive(Debug, Clone)]
pub struct Estimation<'s> {
    pub matches: Vec<Match<'s>>,
    /// `None` when nothing matched
    pub estimate: Option<f64>,
}

impl Estimation<'_> {
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// image -> embedding -> ranked matches -> estimate
///
/// Provider failures are returned as-is; nothing here retries or hides them.
pub struct NetWorthPipeline<P> {
    provider: P,
    ranker: SimilarityRanker,
}

impl<P: EmbeddingProvider> NetWorthPipeline<P> {
    pub fn new(provider: P, config: RankerConfig) -> Result<Self> {
        Ok(Self {
            provider,
            ranker: SimilarityRanker::new(config)?,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn ranker(&self) -> &SimilarityRanker {
        &self.ranker
    }

    pub fn estimate_image<'s>(&self, image: &[u8], store: &'s ProfileStore) -> Result<Estimation<'s>> {
        let query = self.provider.embed(image)?;
        self.estimate_vector(&query, store)
    }

    pub fn estimate_vector<'s>(&self, query: &Vector, store: &'s ProfileStore) -> Result<Estimation<'s>> {
        let matches = self.ranker.rank(query, store)?;
        let estimate = estimate(&matches);
        debug!(
            matches = matches.len(),
            estimate = ?estimate,
            "ranked query against {} profiles",
            store.len()
        );
        Ok(Estimation { matches, estimate })
    }
}
