use serde::{Deserialize, Serialize};
use crate::vector::Vector;

/// A known subject with a precomputed embedding.
///
/// Field names on the wire follow the dataset file format
/// (`net_worth_USD`, `image_path`). Unknown fields are rejected so a
/// malformed dataset fails at load time instead of deep inside ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    #[serde(rename = "net_worth_USD")]
    pub net_worth: f64,
    /// Opaque reference to the canonical image; never opened by the core
    #[serde(rename = "image_path")]
    pub image_reference: String,
    pub embedding: Vector,
}

impl Profile {
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        net_worth: f64,
        image_reference: impl Into<String>,
        embedding: Vector,
    ) -> Self {
        Self {
            name: name.into(),
            net_worth,
            image_reference: image_reference.into(),
            embedding,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.embedding.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_dataset_record() {
        let json = r#"{
            "name": "Andrew Ng",
            "net_worth_USD": 80000000,
            "image_path": "./Celebrity_Image/AndrewNg.jpg",
            "embedding": [0.1, 0.2, 0.3]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Andrew Ng");
        assert_eq!(profile.net_worth, 80_000_000.0);
        assert_eq!(profile.image_reference, "./Celebrity_Image/AndrewNg.jpg");
        assert_eq!(profile.dim(), 3);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"name": "X", "image_path": "x.jpg", "embedding": [1.0]}"#;
        assert!(serde_json::from_str::<Profile>(json).is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let json = r#"{"name": "X", "net_worth_USD": 1, "image_path": "x.jpg",
                       "embedding": [1.0], "age": 40}"#;
        assert!(serde_json::from_str::<Profile>(json).is_err());
    }

    #[test]
    fn test_serializes_with_dataset_field_names() {
        let profile = Profile::new("A", 100.0, "a.jpg", Vector::new(vec![1.0, 0.0]));
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["net_worth_USD"], 100.0);
        assert_eq!(value["image_path"], "a.jpg");
        assert_eq!(value["embedding"], serde_json::json!([1.0, 0.0]));
    }
}
