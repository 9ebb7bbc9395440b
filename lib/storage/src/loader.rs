use networth_core::{Error, Profile, ProfileStore, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the generated dataset lives unless told otherwise
pub const DEFAULT_DATASET_PATH: &str = "./Celebrity_Image/mock_profiles.json";

/// Dataset location, passed in rather than read from a global
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

impl DatasetConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Reads the JSON profile dataset into a validated [`ProfileStore`]
#[derive(Debug, Clone, Default)]
pub struct ProfileStoreLoader {
    config: DatasetConfig,
}

impl ProfileStoreLoader {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn load(&self) -> Result<ProfileStore> {
        load_from_path(&self.config.path)
    }
}

/// Load a dataset file.
///
/// A missing file is [`Error::DatasetNotFound`]; anything that does not parse
/// into well-formed profiles of one dimension is [`Error::DatasetCorrupt`].
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ProfileStore> {
    let path = path.as_ref();
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let store = parse_profiles(path, &data)?;
    info!(
        "Loaded {} profiles (dimension {}) from {:?}",
        store.len(),
        store.dim(),
        path
    );
    Ok(store)
}

/// Parse dataset bytes; `origin` is only used in error messages
pub fn parse_profiles(origin: &Path, data: &[u8]) -> Result<ProfileStore> {
    let profiles: Vec<Profile> = serde_json::from_slice(data)
        .map_err(|e| Error::corrupt(origin, format!("invalid JSON: {}", e)))?;
    ProfileStore::new(profiles).map_err(|e| Error::corrupt(origin, e.to_string()))
}
