// Startup helpers for the server: make sure a dataset exists, then push one
// known image through the whole pipeline before accepting requests.

use networth_core::{EmbeddingProvider, Error, NetWorthPipeline, ProfileStore, Result};
use std::path::PathBuf;
use tracing::info;
use crate::{DatasetGenerator, ProfileStoreLoader, Subject};

/// Load the dataset, generating it from `subjects` first when the file does
/// not exist yet. A corrupt file is still an error; it is never overwritten.
pub fn load_or_generate<P: EmbeddingProvider>(
    loader: &ProfileStoreLoader,
    generator: &DatasetGenerator<P>,
    subjects: &[Subject],
) -> Result<ProfileStore> {
    match loader.load() {
        Err(Error::DatasetNotFound { path }) => {
            info!("Dataset not found at {:?}. Generating it now", path);
            let report = generator.generate(subjects, &path)?;
            info!(
                succeeded = report.succeeded,
                failed = report.failed,
                "Dataset generation complete"
            );
            loader.load()
        }
        other => other,
    }
}

/// What the startup check saw for the first profile's own image
#[derive(Debug, Clone, PartialEq)]
pub struct SampleCheck {
    pub image: PathBuf,
    pub matches: usize,
    pub top_match: Option<String>,
    pub estimate: Option<f64>,
}

/// Re-embed the first profile's source image and rank it against `store`.
///
/// Returns `Ok(None)` for an empty store. The result is logged at `info`.
pub fn sample_check<P: EmbeddingProvider>(
    pipeline: &NetWorthPipeline<P>,
    store: &ProfileStore,
) -> Result<Option<SampleCheck>> {
    let Some(first) = store.profiles().first() else {
        info!("Dataset is empty; skipping the sample check");
        return Ok(None);
    };

    let image = PathBuf::from(&first.image_reference);
    info!("Running a sample estimate with {:?}", image);
    let bytes = std::fs::read(&image)?;
    let result = pipeline.estimate_image(&bytes, store)?;

    let check = SampleCheck {
        image,
        matches: result.matches.len(),
        top_match: result.matches.first().map(|m| m.profile.name.clone()),
        estimate: result.estimate,
    };
    info!(
        matches = check.matches,
        top_match = ?check.top_match,
        estimate = ?check.estimate,
        "Sample check complete"
    );
    Ok(Some(check))
}
