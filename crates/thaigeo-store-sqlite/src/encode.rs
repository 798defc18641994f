//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Parent links are nullable
//! integers; a stored `0` decodes as no parent.

use chrono::{DateTime, Utc};
use thaigeo_core::geo::{District, Province, RowId, Subdistrict, parent_ref};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub const PROVINCE_COLUMNS: &str = "id, code, name_th, name_en, created_at";
pub const DISTRICT_COLUMNS: &str = "id, code, name_th, name_en, province_id, created_at";
pub const SUBDISTRICT_COLUMNS: &str =
  "id, code, name_th, name_en, postal_code, district_id, created_at";

/// Raw column values for a province row, as read from SQLite.
pub struct RawProvince {
  pub id:         RowId,
  pub code:       String,
  pub name_th:    String,
  pub name_en:    String,
  pub created_at: String,
}

impl RawProvince {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      code:       row.get(1)?,
      name_th:    row.get(2)?,
      name_en:    row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_province(self) -> Result<Province> {
    Ok(Province {
      id:         self.id,
      code:       self.code,
      name_th:    self.name_th,
      name_en:    self.name_en,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawDistrict {
  pub id:          RowId,
  pub code:        String,
  pub name_th:     String,
  pub name_en:     String,
  pub province_id: Option<RowId>,
  pub created_at:  String,
}

impl RawDistrict {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      code:        row.get(1)?,
      name_th:     row.get(2)?,
      name_en:     row.get(3)?,
      province_id: row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_district(self) -> Result<District> {
    Ok(District {
      id:          self.id,
      code:        self.code,
      name_th:     self.name_th,
      name_en:     self.name_en,
      province_id: parent_ref(self.province_id),
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawSubdistrict {
  pub id:          RowId,
  pub code:        String,
  pub name_th:     String,
  pub name_en:     String,
  pub postal_code: String,
  pub district_id: Option<RowId>,
  pub created_at:  String,
}

impl RawSubdistrict {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      code:        row.get(1)?,
      name_th:     row.get(2)?,
      name_en:     row.get(3)?,
      postal_code: row.get(4)?,
      district_id: row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_subdistrict(self) -> Result<Subdistrict> {
    Ok(Subdistrict {
      id:          self.id,
      code:        self.code,
      name_th:     self.name_th,
      name_en:     self.name_en,
      postal_code: self.postal_code,
      district_id: parent_ref(self.district_id),
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
