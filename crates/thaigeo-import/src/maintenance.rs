//! Out-of-band maintenance: row counts and the destructive clear.

use thaigeo_core::{
  geo::{Level, LevelCounts},
  store::GeoStore,
};

use crate::error::ResetError;

/// Reference totals for Thailand as published by the default source.
pub const THAILAND_TOTALS: LevelCounts = LevelCounts {
  provinces:    77,
  districts:    928,
  subdistricts: 7436,
};

/// Count the rows at every level.
///
/// Never fails: a level whose count cannot be read is logged and reported
/// as zero.
pub async fn stats<S: GeoStore>(store: &S) -> LevelCounts {
  let mut counts = LevelCounts::default();
  for level in Level::ALL {
    match store.count(level).await {
      Ok(n) => counts.set(level, n),
      Err(e) => tracing::warn!(%level, error = %e, "count failed; reporting zero"),
    }
  }
  counts
}

/// Delete every row, children before parents.
///
/// Stops at the first table that cannot be cleared; tables above it are left
/// untouched. Returns the number of rows removed per level.
pub async fn reset<S: GeoStore>(store: &S) -> Result<LevelCounts, ResetError> {
  let mut deleted = LevelCounts::default();
  for level in Level::ALL.into_iter().rev() {
    let n = store
      .delete_all(level)
      .await
      .map_err(|e| ResetError::Delete { table: level, source: Box::new(e) })?;
    tracing::info!(table = level.table(), deleted = n, "table cleared");
    deleted.set(level, n);
  }
  Ok(deleted)
}
