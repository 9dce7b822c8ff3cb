//! Error types for geoadmin
//!
//! All errors carry enough context for the caller to decide whether to
//! retry, and the message text tells the user what to do next.

use thiserror::Error;

/// Result type alias for geoadmin operations
pub type Result<T> = std::result::Result<T, GeoError>;

/// Error type covering dataset lifecycle and name resolution
///
/// Lookup misses are not errors; resolver operations return `Ok(None)` or
/// an empty result instead. Errors are reserved for missing datasets,
/// failed verification, corrupt published data, and invalid arguments.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Required local dataset file is missing
    #[error("Dataset file not found: '{0}'. Download the data first with 'geoadmin download' or GeoData::download().")]
    NotFound(String),

    /// Downloaded file digest did not match the manifest hash
    #[error("Checksum verification failed for '{file}': expected '{expected}', got '{actual}'. The download may be corrupted; re-run the fetch.")]
    Integrity {
        file: String,
        expected: String,
        actual: String,
    },

    /// Compressed payload could not be decoded
    #[error("Failed to decompress '{file}': the payload is not a valid gzip stream. Re-run the fetch.")]
    Decode {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// Persisted dataset record has an unsupported schema version
    #[error("The data directory was written by an incompatible geoadmin version (state schema {found}, supported {supported}). Remove the directory and download again.")]
    IncompatibleData { found: u64, supported: u64 },

    /// Caller supplied an out-of-range administrative level
    #[error("Invalid administrative level {0}: expected 0 (country) through 5")]
    InvalidLevel(i64),

    /// Published dataset files are internally inconsistent
    #[error("Corrupt dataset: {0}. Re-download the data with 'geoadmin download --update'.")]
    Corrupt(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Set GEOADMIN_DATA_DIR to choose a dataset directory explicitly.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and the source URL.")]
    Http(#[from] reqwest::Error),

    /// Store query failed
    #[error("Store error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}. Check the manifest contents.")]
    Json(#[from] serde_json::Error),
}

impl GeoError {
    /// Create a not-found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an integrity error
    pub fn integrity(
        file: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Integrity {
            file: file.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a corrupt-dataset error
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
