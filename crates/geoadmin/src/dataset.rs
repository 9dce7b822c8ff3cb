//! Dataset lifecycle: versioned download and refresh policy
//!
//! A published dataset is a pair of files (the relation and the fuzzy
//! index) described by a small remote manifest. The installed version is
//! recorded in `state.json`; the record is deleted before a refresh starts
//! and rewritten only after every file has been fetched and verified, so a
//! crash mid-refresh never leaves a record claiming data that isn't there.

use crate::error::{GeoError, Result};
use crate::fetch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default remote manifest describing the latest published dataset
pub const DEFAULT_SOURCE: &str = "https://geoadmin-lab.github.io/geoadmin-data/info.json";

/// Relation file holding the administrative areas
pub const DB_FILENAME: &str = "admins.gpkg";

/// Fuzzy-index file keyed by normalized alias names
pub const INDEX_FILENAME: &str = "admins.names.trie";

/// Persisted dataset state record
const STATE_FILENAME: &str = "state.json";

/// Only `state.json` schema this version can read
const STATE_VERSION: u64 = 1;

/// Files every complete dataset must provide
const REQUIRED_FILES: [&str; 2] = [DB_FILENAME, INDEX_FILENAME];

/// Download location and digest for one dataset file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRef {
    pub url: String,
    pub sha1: String,
}

/// The `data` object shared by the remote manifest and the local record
///
/// Holds the opaque version tag plus one [`FileRef`] per published file,
/// keyed by file name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetVersion {
    pub version: String,

    #[serde(flatten)]
    pub files: HashMap<String, FileRef>,
}

/// Remote manifest document (`info.json`)
#[derive(Debug, Clone, Deserialize)]
struct RemoteManifest {
    data: DatasetVersion,
}

/// Local dataset state record (`state.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetState {
    /// Record schema version; only [`STATE_VERSION`] is supported
    pub version: u64,

    /// The installed dataset's version descriptor
    pub data: DatasetVersion,
}

impl DatasetState {
    /// Load the state record from a dataset directory.
    ///
    /// Returns `Ok(None)` when no record exists. A record with an
    /// unsupported schema version is a fatal incompatibility, never
    /// migrated automatically.
    pub fn load(dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = dir.as_ref().join(STATE_FILENAME);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let state: DatasetState = serde_json::from_str(&content)?;
        if state.version != STATE_VERSION {
            return Err(GeoError::IncompatibleData {
                found: state.version,
                supported: STATE_VERSION,
            });
        }

        Ok(Some(state))
    }

    /// Save the state record into a dataset directory
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.as_ref().join(STATE_FILENAME), content)?;
        Ok(())
    }

    /// Remove the state record from a dataset directory, if present
    fn remove(dir: &Path) -> Result<()> {
        let path = dir.join(STATE_FILENAME);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Create a fresh record for `data`
    fn new(data: DatasetVersion) -> Self {
        Self {
            version: STATE_VERSION,
            data,
        }
    }
}

/// Resolve the dataset directory.
///
/// `GEOADMIN_DATA_DIR` names the directory directly when set; otherwise the
/// platform cache directory plus a fixed subfolder is used.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("GEOADMIN_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let cache = dirs::cache_dir()
        .ok_or_else(|| GeoError::config("Could not determine the cache directory"))?;
    Ok(cache.join("geoadmin"))
}

/// Download the dataset into `destination`, honoring the refresh policy.
///
/// With an existing state record and `update == false` the installed data is
/// accepted unconditionally, without touching the network. With
/// `update == true` the remote manifest is compared to the record: equal
/// version tags short-circuit; a differing tag (or no record at all)
/// triggers a full verified download of every required file. Returns the
/// dataset directory.
pub async fn download(destination: Option<PathBuf>, source: &str, update: bool) -> Result<PathBuf> {
    let destination = match destination {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // A schema mismatch in the record is fatal before any network I/O.
    let state = DatasetState::load(&destination)?;
    if let Some(state) = &state {
        if !update {
            info!(version = %state.data.version, "Dataset is present, skipping update check");
            return Ok(destination);
        }
    }

    let client = reqwest::Client::new();
    info!(source = %source, "Fetching dataset manifest");
    let remote: RemoteManifest = client
        .get(source)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if let Some(state) = state {
        if state.data.version == remote.data.version {
            info!(version = %state.data.version, "Dataset is up to date");
            return Ok(destination);
        }
        // Drop the record before touching any file so an interrupted
        // refresh never leaves a record claiming data that isn't present.
        DatasetState::remove(&destination)?;
    }

    std::fs::create_dir_all(&destination)?;

    for name in REQUIRED_FILES {
        let file_ref = remote.data.files.get(name).ok_or_else(|| {
            GeoError::corrupt(format!("remote manifest has no entry for '{name}'"))
        })?;
        info!(file = name, url = %file_ref.url, "Downloading dataset file");
        fetch::fetch(&client, &file_ref.url, &destination.join(name), &file_ref.sha1).await?;
    }

    let state = DatasetState::new(remote.data);
    state.save(&destination)?;
    info!(version = %state.data.version, "Dataset downloaded");

    Ok(destination)
}
