// One-off dataset generation: embed each subject's canonical image and write
// the profile table the loader reads.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use networth_core::{EmbeddingProvider, Error, Profile, Result};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A known person to embed; becomes a [`Profile`] once embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Subject {
    pub name: String,
    #[serde(rename = "net_worth_USD")]
    pub net_worth: f64,
    pub image_path: PathBuf,
}

impl Subject {
    pub fn new(name: impl Into<String>, net_worth: f64, image_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            net_worth,
            image_path: image_path.into(),
        }
    }
}

/// The built-in subject list shipped with the demo images
pub fn default_subjects() -> Vec<Subject> {
    vec![
        Subject::new("Taylor Swift", 1_300_000_000.0, "./Celebrity_Image/TaylorSwift.jpg"),
        Subject::new("Jensen Huang", 91_000_000_000.0, "./Celebrity_Image/JensenHuang.jpg"),
        Subject::new("Elon Musk", 200_000_000_000.0, "./Celebrity_Image/ElonMusk.jpg"),
        Subject::new("Andrew Ng", 80_000_000.0, "./Celebrity_Image/AndrewNg.jpg"),
        Subject::new("Oprah Winfrey", 2_800_000_000.0, "./Celebrity_Image/OprahWinfrey.jpg"),
    ]
}

/// Read a JSON array of subjects to use instead of [`default_subjects`]
pub fn load_subjects<P: AsRef<Path>>(path: P) -> Result<Vec<Subject>> {
    let data = std::fs::read(path.as_ref())?;
    serde_json::from_slice(&data).map_err(|e| {
        Error::Serialization(format!("subjects manifest {:?}: {}", path.as_ref(), e))
    })
}

/// Outcome counts for one generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct DatasetGenerator<P> {
    provider: P,
}

impl<P: EmbeddingProvider> DatasetGenerator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Embed every subject and write the dataset to `output`.
    ///
    /// Subjects whose image is missing or fails to embed are skipped and
    /// counted; they never abort the run. The file is still written with the
    /// profiles that did succeed.
    pub fn generate(&self, subjects: &[Subject], output: &Path) -> Result<GenerationReport> {
        info!("Starting the data generation process for {} subjects", subjects.len());

        let mut report = GenerationReport {
            total: subjects.len(),
            ..Default::default()
        };
        let mut profiles = Vec::with_capacity(subjects.len());

        for subject in subjects {
            match self.embed_subject(subject) {
                Ok(profile) => {
                    info!("Created embedding for {}", subject.name);
                    profiles.push(profile);
                    report.succeeded += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", subject.name, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed,
            "Data generation summary"
        );

        write_dataset(output, &profiles)?;
        info!("Dataset saved to {:?}", output);
        Ok(report)
    }

    fn embed_subject(&self, subject: &Subject) -> Result<Profile> {
        // The dataset stores the path as a JSON string; refuse to rewrite it
        let image_reference = subject.image_path.to_str().ok_or_else(|| {
            Error::Serialization(format!(
                "image path {:?} is not valid UTF-8",
                subject.image_path
            ))
        })?;

        let image = std::fs::read(&subject.image_path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("image file not found at {:?}", subject.image_path),
                )
            } else {
                e
            }
        })?;

        let embedding = self.provider.embed(&image)?;
        if embedding.dim() != self.provider.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.provider.dim(),
                actual: embedding.dim(),
            });
        }

        Ok(Profile::new(
            subject.name.clone(),
            subject.net_worth,
            image_reference,
            embedding,
        ))
    }
}

/// Write profiles as a pretty-printed JSON array, replacing `path` atomically
pub fn write_dataset(path: &Path, profiles: &[Profile]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(profiles)
        .map_err(|e| Error::Serialization(e.to_string()))?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&json))
        .map_err(|e| match e {
            atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_from_path;
    use networth_core::{ShingleEmbedder, StaticEmbedder, Vector};
    use std::fs;

    #[test]
    fn test_generate_skips_missing_images() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.jpg");
        fs::write(&present, b"jpeg bytes for a face").unwrap();

        let subjects = vec![
            Subject::new("Present", 1000.0, &present),
            Subject::new("Missing", 3000.0, dir.path().join("missing.jpg")),
        ];
        let output = dir.path().join("out/profiles.json");

        let generator = DatasetGenerator::new(ShingleEmbedder::new(32).unwrap());
        let report = generator.generate(&subjects, &output).unwrap();
        assert_eq!(report, GenerationReport { total: 2, succeeded: 1, failed: 1 });

        let store = load_from_path(&output).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.dim(), 32);
        assert_eq!(store.profiles()[0].name, "Present");
        assert_eq!(store.profiles()[0].image_reference, present.to_string_lossy());
    }

    #[test]
    fn test_generate_counts_embedding_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.jpg");
        let bad = dir.path().join("bad.jpg");
        fs::write(&good, b"good").unwrap();
        fs::write(&bad, b"unrecognised").unwrap();

        let provider = StaticEmbedder::new(2).with(b"good".to_vec(), Vector::new(vec![0.6, 0.8]));
        let subjects = vec![Subject::new("Good", 1.0, &good), Subject::new("Bad", 2.0, &bad)];
        let output = dir.path().join("profiles.json");

        let report = DatasetGenerator::new(provider).generate(&subjects, &output).unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_rejects_non_utf8_image_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join(OsStr::from_bytes(b"caf\xe9.jpg"));
        fs::write(&odd, b"jpeg bytes").unwrap();
        let plain = dir.path().join("plain.jpg");
        fs::write(&plain, b"other jpeg bytes").unwrap();

        let subjects = vec![Subject::new("Odd", 1.0, &odd), Subject::new("Plain", 2.0, &plain)];
        let output = dir.path().join("profiles.json");
        let report = DatasetGenerator::new(ShingleEmbedder::new(16).unwrap())
            .generate(&subjects, &output)
            .unwrap();
        assert_eq!(report, GenerationReport { total: 2, succeeded: 1, failed: 1 });

        let store = load_from_path(&output).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.profiles()[0].name, "Plain");
    }

    #[test]
    fn test_write_dataset_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "garbage").unwrap();

        let profiles = vec![Profile::new("A", 5.0, "a.jpg", Vector::new(vec![1.0]))];
        write_dataset(&path, &profiles).unwrap();

        let store = load_from_path(&path).unwrap();
        assert_eq!(store.profiles(), profiles.as_slice());
    }

    #[test]
    fn test_default_subjects() {
        let subjects = default_subjects();
        assert_eq!(subjects.len(), 5);
        assert_eq!(subjects[3].name, "Andrew Ng");
        assert_eq!(subjects[3].net_worth, 80_000_000.0);
    }

    #[test]
    fn test_load_subjects_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subjects.json");
        fs::write(
            &path,
            r#"[{"name": "A", "net_worth_USD": 10, "image_path": "img/a.jpg"}]"#,
        )
        .unwrap();
        let subjects = load_subjects(&path).unwrap();
        assert_eq!(subjects, vec![Subject::new("A", 10.0, "img/a.jpg")]);

        fs::write(&path, r#"[{"name": "A"}]"#).unwrap();
        assert!(matches!(load_subjects(&path), Err(Error::Serialization(_))));
    }
}
