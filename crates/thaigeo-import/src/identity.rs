//! Run-scoped identity maps.
//!
//! While an import runs, every province and district that was found or created
//! is remembered under the keys a child record might use to refer to it: its
//! canonical code and, when the source has one, its source identifier. The
//! maps live exactly as long as one run and are never persisted.

use std::collections::HashMap;

use thaigeo_core::{
  geo::{Level, RowId},
  store::GeoStore,
};

use crate::{error::RecordError, layout::ParentKey};

/// Source key → local primary key for one level.
#[derive(Debug)]
pub struct IdentityMap {
  level:        Level,
  by_code:      HashMap<String, RowId>,
  by_source_id: HashMap<String, RowId>,
}

impl IdentityMap {
  pub fn new(level: Level) -> Self {
    Self {
      level,
      by_code: HashMap::new(),
      by_source_id: HashMap::new(),
    }
  }

  /// Remember `id` under `code` and, if given, `source_id`.
  pub fn insert(&mut self, code: &str, source_id: Option<&str>, id: RowId) {
    self.by_code.insert(code.to_owned(), id);
    if let Some(sid) = source_id {
      self.by_source_id.insert(sid.to_owned(), id);
    }
  }

  pub fn get(&self, key: &ParentKey) -> Option<RowId> {
    match key {
      ParentKey::Code(code) => self.by_code.get(code).copied(),
      ParentKey::SourceId(sid) => self.by_source_id.get(sid).copied(),
      ParentKey::Missing => None,
    }
  }

  fn gap(&self, key: &ParentKey) -> RecordError {
    RecordError::ResolutionGap { parent: self.level, key: key.describe() }
  }
}

/// Resolve a district's province from the province map alone.
pub fn resolve_province(provinces: &IdentityMap, key: &ParentKey) -> Result<RowId, RecordError> {
  provinces.get(key).ok_or_else(|| provinces.gap(key))
}

/// Resolve a subdistrict's district, falling back to the store.
///
/// The district map can have holes: a district may have failed to import
/// earlier in this run, or may exist from a previous run under a source that
/// no longer lists it. When the reference is a canonical code the store is
/// asked directly and a hit is cached in `districts`.
pub async fn resolve_district<S: GeoStore>(
  store:     &S,
  districts: &mut IdentityMap,
  key:       &ParentKey,
) -> Result<RowId, RecordError> {
  if let Some(id) = districts.get(key) {
    return Ok(id);
  }

  let ParentKey::Code(code) = key else {
    return Err(districts.gap(key));
  };

  match store.find_district(code).await.map_err(RecordError::store)? {
    Some(d) => {
      tracing::debug!(district = %code, id = d.id, "district resolved from store");
      districts.insert(code, None, d.id);
      Ok(d.id)
    }
    None => Err(districts.gap(key)),
  }
}
