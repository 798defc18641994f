//! Import and reconciliation of the Thai administrative hierarchy.
//!
//! Provinces, districts and subdistricts are fetched from a [`GeoSource`],
//! normalized through a [`SourceLayout`], and reconciled into a
//! [`GeoStore`](thaigeo_core::store::GeoStore) one level at a time. Re-running
//! an import against the same data creates nothing new.

pub mod error;
pub mod identity;
pub mod importer;
pub mod layout;
pub mod maintenance;
pub mod report;
pub mod source;
pub mod upsert;

pub use error::{FetchError, ImportError, RecordError, ResetError};
pub use importer::Importer;
pub use layout::SourceLayout;
pub use report::{ImportSummary, LevelReport};
pub use source::{GeoSource, HttpSource, MemorySource, SourceUrls};
