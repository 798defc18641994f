//! Error types for `thaigeo-import`.
//!
//! Only [`ImportError`] and [`ResetError`] ever reach a caller. A
//! [`RecordError`] is confined to a single record: it is logged, counted in the
//! level report, and the batch moves on.

use thaigeo_core::geo::Level;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to retrieve one source collection.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Network(#[from] reqwest::Error),

  #[error("unexpected status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("could not decode payload: {0}")]
  Decode(#[from] serde_json::Error),
}

impl FetchError {
  /// Short machine-readable cause, used in API error bodies.
  pub fn cause(&self) -> &'static str {
    match self {
      FetchError::Network(_) => "network",
      FetchError::Status { .. } => "http-status",
      FetchError::Decode(_) => "decode",
    }
  }
}

/// Run-level failure of an import.
#[derive(Debug, Error)]
pub enum ImportError {
  #[error("failed to fetch {}: {source}", .phase.table())]
  Fetch {
    phase:  Level,
    #[source]
    source: FetchError,
  },

  #[error("an import or reset is already in progress")]
  AlreadyRunning,
}

/// Failure of the clear operation.
#[derive(Debug, Error)]
pub enum ResetError {
  #[error("failed to clear {}: {source}", .table.table())]
  Delete {
    table:  Level,
    #[source]
    source: BoxError,
  },

  #[error("an import or reset is already in progress")]
  Busy,
}

/// Why a single record was skipped.
#[derive(Debug, Error)]
pub enum RecordError {
  #[error("{0} record has no canonical code")]
  Invalid(Level),

  #[error("{parent} {key:?} is not known")]
  ResolutionGap { parent: Level, key: String },

  #[error("store error: {0}")]
  Persistence(#[source] BoxError),
}

impl RecordError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    RecordError::Persistence(Box::new(e))
  }
}
