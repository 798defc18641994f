//! Error type for `thaigeo-store-sqlite`.

use thaigeo_core::geo::{Level, RowId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] thaigeo_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A parent-link update targeted a row that does not exist.
  #[error("{level} {id} not found")]
  NotFound { level: Level, id: RowId },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
