//! # networth-storage
//!
//! Everything that touches the dataset file: loading it into a
//! [`networth_core::ProfileStore`], generating it from subject images, and
//! sharing the loaded snapshot across request handlers. The server's startup
//! path lives in [`bootstrap`].

pub mod loader;
pub mod generate;
pub mod shared;
pub mod bootstrap;

pub use loader::{load_from_path, parse_profiles, DatasetConfig, ProfileStoreLoader, DEFAULT_DATASET_PATH};
pub use generate::{default_subjects, load_subjects, write_dataset, DatasetGenerator, GenerationReport, Subject};
pub use shared::SharedStore;
pub use bootstrap::{load_or_generate, sample_check, SampleCheck};
