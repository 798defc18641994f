//! Province, district and subdistrict rows.
//!
//! The three levels form a strict hierarchy. Each row is keyed locally by an
//! integer [`RowId`] assigned by the store, and naturally by its canonical
//! code (see [`crate::code`]). Parent links are optional in the type because
//! rows written by older imports may carry a null (or `0`) parent; the importer
//! repairs those on the next run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Locally assigned primary key.
pub type RowId = i64;

// ─── Level ───────────────────────────────────────────────────────────────────

/// One of the three levels of the administrative hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Province,
  District,
  Subdistrict,
}

impl Level {
  /// Parent-first order, the order in which levels are imported.
  pub const ALL: [Level; 3] = [Level::Province, Level::District, Level::Subdistrict];

  /// Name of the backing table.
  pub const fn table(self) -> &'static str {
    match self {
      Level::Province => "provinces",
      Level::District => "districts",
      Level::Subdistrict => "subdistricts",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Level::Province => "province",
      Level::District => "district",
      Level::Subdistrict => "subdistrict",
    })
  }
}

// ─── Persisted rows ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
  pub id:         RowId,
  pub code:       String,
  pub name_th:    String,
  pub name_en:    String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
  pub id:          RowId,
  pub code:        String,
  pub name_th:     String,
  pub name_en:     String,
  pub province_id: Option<RowId>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdistrict {
  pub id:          RowId,
  pub code:        String,
  pub name_th:     String,
  pub name_en:     String,
  /// Five-digit postal code, or empty when the source had none.
  pub postal_code: String,
  pub district_id: Option<RowId>,
  pub created_at:  DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProvince {
  pub code:    String,
  pub name_th: String,
  pub name_en: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDistrict {
  pub code:        String,
  pub name_th:     String,
  pub name_en:     String,
  pub province_id: Option<RowId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubdistrict {
  pub code:        String,
  pub name_th:     String,
  pub name_en:     String,
  pub postal_code: String,
  pub district_id: Option<RowId>,
}

/// Reject a row whose canonical code is empty.
pub fn require_code(level: Level, code: &str) -> Result<()> {
  if code.is_empty() {
    Err(Error::MissingCode(level))
  } else {
    Ok(())
  }
}

/// A stored parent reference of `0` means "no parent".
pub fn parent_ref(raw: Option<RowId>) -> Option<RowId> { raw.filter(|id| *id > 0) }

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Row counts for the three levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
  pub provinces:    u64,
  pub districts:    u64,
  pub subdistricts: u64,
}

impl LevelCounts {
  pub fn get(&self, level: Level) -> u64 {
    match level {
      Level::Province => self.provinces,
      Level::District => self.districts,
      Level::Subdistrict => self.subdistricts,
    }
  }

  pub fn set(&mut self, level: Level, value: u64) {
    match level {
      Level::Province => self.provinces = value,
      Level::District => self.districts = value,
      Level::Subdistrict => self.subdistricts = value,
    }
  }
}
