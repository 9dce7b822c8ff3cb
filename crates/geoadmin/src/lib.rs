//! Administrative-geography name resolution
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Resolves place names against a versioned local dataset of administrative
//! regions (country through admin level 5) and manages that dataset's
//! lifecycle: checksum-verified download, refresh, and safe concurrent read
//! access from an embedded store.
//!
//! # Overview
//!
//! - **Dataset lifecycle**: [`GeoData::download`] fetches the published
//!   dataset (relation + fuzzy index), verifying every file against the
//!   remote manifest's SHA-1 digests and publishing atomically.
//! - **Exact resolution**: [`GeoData::resolve_name`] and
//!   [`GeoData::resolve_name_all`] look names up in the alias relation
//!   after case-folding and Unicode composition.
//! - **Fuzzy resolution**: [`GeoData::resolve_name_fuzzy`] scores
//!   candidates from an n-gram index shipped with the dataset.
//! - **Hierarchy**: an [`Area`] can load its alias set and reconstruct its
//!   ancestors ([`Area::parent_area`]) up to the country tier.
//!
//! The dataset is immutable once published, so any number of threads may
//! resolve concurrently; each thread lazily opens its own store connection.
//!
//! # Example
//!
//! ```no_run
//! use geoadmin::{dataset, GeoData};
//!
//! # #[tokio::main]
//! # async fn main() -> geoadmin::Result<()> {
//! let geo = GeoData::download(None, dataset::DEFAULT_SOURCE, false).await?;
//! if let Some(area) = geo.resolve_name("Springfield")? {
//!     println!("{} [{}] level={}", area.name(), area.id(), area.level());
//!     if let Some(parent) = area.parent_area(None)? {
//!         println!("  in {}", parent.name());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod area;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod ngram;
pub mod resolver;
mod store;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod fixtures;

// Re-export commonly used types
pub use area::{Area, Bounds, Level};
pub use error::{GeoError, Result};
pub use ngram::NgramIndex;
pub use resolver::{normalize, GeoData, ResolveAll, DEFAULT_FUZZY_THRESHOLD};
