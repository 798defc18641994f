//! Error types for `thaigeo-core`.

use thiserror::Error;

use crate::geo::Level;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} record has no canonical code")]
  MissingCode(Level),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
