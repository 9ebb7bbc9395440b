use thiserror::Error;
use crate::Profile;

/// Why a set of profiles cannot form a store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreValidationError {
    #[error("profile #{index} ({name}) has an empty embedding")]
    EmptyEmbedding { index: usize, name: String },

    #[error("profile #{index} ({name}) has embedding dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("profile #{index} ({name}) has a non-finite embedding component")]
    NonFiniteEmbedding { index: usize, name: String },

    #[error("profile #{index} ({name}) has an embedding norm that is not finite")]
    NonFiniteNorm { index: usize, name: String },

    #[error("profile #{index} ({name}) has invalid net worth {value}")]
    InvalidNetWorth { index: usize, name: String, value: f64 },
}

/// Read-only table of profiles sharing one embedding dimension.
///
/// Embedding norms are computed once here so a ranking pass only needs the
/// query norm and one dot product per profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
    norms: Vec<f64>,
    dim: usize,
}

impl ProfileStore {
    /// Build a store, checking that every embedding has the dimension of the
    /// first one and that all numbers are usable.
    pub fn new(profiles: Vec<Profile>) -> Result<Self, StoreValidationError> {
        let dim = profiles.first().map(Profile::dim).unwrap_or(0);
        let mut norms = Vec::with_capacity(profiles.len());

        for (index, profile) in profiles.iter().enumerate() {
            if profile.embedding.is_empty() {
                return Err(StoreValidationError::EmptyEmbedding {
                    index,
                    name: profile.name.clone(),
                });
            }
            if profile.dim() != dim {
                return Err(StoreValidationError::DimensionMismatch {
                    index,
                    name: profile.name.clone(),
                    expected: dim,
                    actual: profile.dim(),
                });
            }
            if !profile.embedding.is_finite() {
                return Err(StoreValidationError::NonFiniteEmbedding {
                    index,
                    name: profile.name.clone(),
                });
            }
            if !profile.net_worth.is_finite() || profile.net_worth < 0.0 {
                return Err(StoreValidationError::InvalidNetWorth {
                    index,
                    name: profile.name.clone(),
                    value: profile.net_worth,
                });
            }

            let norm = profile.embedding.norm();
            if !norm.is_finite() {
                return Err(StoreValidationError::NonFiniteNorm {
                    index,
                    name: profile.name.clone(),
                });
            }
            norms.push(norm);
        }

        Ok(Self { profiles, norms, dim })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Embedding dimension shared by all profiles; 0 for an empty store
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    #[inline]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Cached L2 norms, index-aligned with [`Self::profiles`]
    #[inline]
    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }
}

impl<'a> IntoIterator for &'a ProfileStore {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    fn profile(name: &str, worth: f64, emb: Vec<f32>) -> Profile {
        Profile::new(name, worth, format!("{}.jpg", name), Vector::new(emb))
    }

    #[test]
    fn test_store_caches_norms() {
        let store = ProfileStore::new(vec![
            profile("a", 1.0, vec![3.0, 4.0]),
            profile("b", 2.0, vec![0.0, 0.0]),
        ])
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.dim(), 2);
        assert!((store.norms()[0] - 5.0).abs() < 1e-6);
        assert_eq!(store.norms()[1], 0.0);
    }

    #[test]
    fn test_empty_store() {
        let store = ProfileStore::new(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.dim(), 0);
    }

    #[test]
    fn test_rejects_mixed_dimensions() {
        let err = ProfileStore::new(vec![
            profile("a", 1.0, vec![1.0, 0.0]),
            profile("b", 1.0, vec![1.0, 0.0, 0.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            StoreValidationError::DimensionMismatch {
                index: 1,
                name: "b".to_string(),
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(matches!(
            ProfileStore::new(vec![profile("a", 1.0, vec![f32::NAN])]),
            Err(StoreValidationError::NonFiniteEmbedding { index: 0, .. })
        ));
        assert!(matches!(
            ProfileStore::new(vec![profile("a", -5.0, vec![1.0])]),
            Err(StoreValidationError::InvalidNetWorth { index: 0, .. })
        ));
        assert!(matches!(
            ProfileStore::new(vec![profile("a", 5.0, vec![])]),
            Err(StoreValidationError::EmptyEmbedding { index: 0, .. })
        ));
    }

    #[test]
    fn test_lookup_by_name_keeps_order() {
        let store = ProfileStore::new(vec![
            profile("a", 1.0, vec![1.0]),
            profile("b", 2.0, vec![2.0]),
        ])
        .unwrap();
        assert_eq!(store.get("b").map(|p| p.net_worth), Some(2.0));
        assert!(store.get("c").is_none());
        let names: Vec<&str> = store.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_extreme_but_finite_embeddings_have_usable_norms() {
        let store = ProfileStore::new(vec![
            profile("max", 1.0, vec![f32::MAX, f32::MAX]),
            profile("tiny", 2.0, vec![1e-30, 0.0]),
        ])
        .unwrap();
        assert!(store.norms().iter().all(|n| n.is_finite() && *n > 0.0));
        assert!((store.norms()[1] - 1e-30).abs() < 1e-36);
    }
}
