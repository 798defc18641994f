//! Source layouts: where each logical field lives in a source record.
//!
//! Geography datasets rename their JSON fields between releases. A
//! [`SourceLayout`] lists, for every logical field, the candidate field names
//! to try in order; the first one present (and not `null`) wins. Extraction
//! also runs the code normalizer, so nothing past this module sees raw field
//! names or raw code encodings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thaigeo_core::code::{CodeKind, Normalized, normalize, source_key};

/// One decoded element of a source collection.
pub type RawRecord = Map<String, Value>;

// ─── Layout ──────────────────────────────────────────────────────────────────

/// How a child record points at its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum ParentField {
  /// The field holds the parent's code (normalized to the parent's width).
  Code { fields: Vec<String> },
  /// The field holds the parent record's own source identifier.
  SourceId { fields: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceFields {
  pub id:      Vec<String>,
  pub code:    Vec<String>,
  pub name_th: Vec<String>,
  pub name_en: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictFields {
  pub id:       Vec<String>,
  pub code:     Vec<String>,
  pub name_th:  Vec<String>,
  pub name_en:  Vec<String>,
  pub province: ParentField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdistrictFields {
  pub id:          Vec<String>,
  pub code:        Vec<String>,
  pub name_th:     Vec<String>,
  pub name_en:     Vec<String>,
  pub postal_code: Vec<String>,
  pub district:    ParentField,
}

/// Field mapping for all three collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLayout {
  pub provinces:    ProvinceFields,
  pub districts:    DistrictFields,
  pub subdistricts: SubdistrictFields,
}

fn names(list: &[&str]) -> Vec<String> { list.iter().map(|s| (*s).to_owned()).collect() }

impl SourceLayout {
  /// The `src/` layout of `thailand-geography-json`: camel-case fields,
  /// children reference their parents by code.
  pub fn current() -> Self {
    Self {
      provinces:    ProvinceFields {
        id:      names(&["id"]),
        code:    names(&["provinceCode", "province_code", "code"]),
        name_th: names(&["provinceNameTh", "name_th", "nameTh"]),
        name_en: names(&["provinceNameEn", "name_en", "nameEn"]),
      },
      districts:    DistrictFields {
        id:       names(&["id"]),
        code:     names(&["districtCode", "district_code", "code"]),
        name_th:  names(&["districtNameTh", "name_th", "nameTh"]),
        name_en:  names(&["districtNameEn", "name_en", "nameEn"]),
        province: ParentField::Code {
          fields: names(&["provinceCode", "province_code"]),
        },
      },
      subdistricts: SubdistrictFields {
        id:          names(&["id"]),
        code:        names(&["subdistrictCode", "subdistrict_code", "code"]),
        name_th:     names(&["subdistrictNameTh", "name_th", "nameTh"]),
        name_en:     names(&["subdistrictNameEn", "name_en", "nameEn"]),
        postal_code: names(&["postalCode", "postal_code", "zipCode", "zip_code"]),
        district:    ParentField::Code {
          fields: names(&["districtCode", "district_code"]),
        },
      },
    }
  }

  /// The older snake-case layout: children reference their parents by the
  /// parent's source `id`, and codes fall back to the record's `id`.
  pub fn legacy() -> Self {
    Self {
      provinces:    ProvinceFields {
        id:      names(&["id"]),
        code:    names(&["code", "province_code", "id"]),
        name_th: names(&["name_th"]),
        name_en: names(&["name_en"]),
      },
      districts:    DistrictFields {
        id:       names(&["id"]),
        code:     names(&["code", "district_code", "id"]),
        name_th:  names(&["name_th"]),
        name_en:  names(&["name_en"]),
        province: ParentField::SourceId {
          fields: names(&["province_id"]),
        },
      },
      subdistricts: SubdistrictFields {
        id:          names(&["id"]),
        code:        names(&["code", "subdistrict_code", "id"]),
        name_th:     names(&["name_th"]),
        name_en:     names(&["name_en"]),
        postal_code: names(&["zip_code", "postal_code"]),
        district:    ParentField::SourceId {
          fields: names(&["district_id", "amphure_id"]),
        },
      },
    }
  }
}

impl Default for SourceLayout {
  fn default() -> Self { Self::current() }
}

// ─── Extracted records ───────────────────────────────────────────────────────

/// A child's reference to its parent, as far as the source tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentKey {
  /// Canonical code of the parent.
  Code(String),
  /// The parent's identifier within the source.
  SourceId(String),
  Missing,
}

impl ParentKey {
  /// Human-readable form for log lines and error messages.
  pub fn describe(&self) -> String {
    match self {
      ParentKey::Code(c) => format!("code {c}"),
      ParentKey::SourceId(id) => format!("source id {id}"),
      ParentKey::Missing => "none".to_owned(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvinceRecord {
  pub source_id: Option<String>,
  pub code:      Normalized,
  pub name_th:   String,
  pub name_en:   String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRecord {
  pub source_id: Option<String>,
  pub code:      Normalized,
  pub name_th:   String,
  pub name_en:   String,
  pub province:  ParentKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdistrictRecord {
  pub source_id:   Option<String>,
  pub code:        Normalized,
  pub name_th:     String,
  pub name_en:     String,
  pub postal_code: Normalized,
  pub district:    ParentKey,
}

/// First candidate field present in `record` with a non-null value.
fn pick<'a>(record: &'a RawRecord, fields: &[String]) -> Option<&'a Value> {
  fields
    .iter()
    .filter_map(|f| record.get(f))
    .find(|v| !v.is_null())
}

fn text(record: &RawRecord, fields: &[String]) -> String {
  match pick(record, fields) {
    Some(Value::String(s)) => s.trim().to_owned(),
    Some(other) => other.to_string(),
    None => String::new(),
  }
}

fn parent(record: &RawRecord, field: &ParentField, kind: CodeKind) -> ParentKey {
  match field {
    ParentField::Code { fields } => {
      let n = normalize(kind, pick(record, fields));
      if n.is_empty() { ParentKey::Missing } else { ParentKey::Code(n.code) }
    }
    ParentField::SourceId { fields } => match source_key(pick(record, fields)) {
      Some(key) => ParentKey::SourceId(key),
      None => ParentKey::Missing,
    },
  }
}

impl ProvinceFields {
  pub fn extract(&self, record: &RawRecord) -> ProvinceRecord {
    ProvinceRecord {
      source_id: source_key(pick(record, &self.id)),
      code:      normalize(CodeKind::Province, pick(record, &self.code)),
      name_th:   text(record, &self.name_th),
      name_en:   text(record, &self.name_en),
    }
  }
}

impl DistrictFields {
  pub fn extract(&self, record: &RawRecord) -> DistrictRecord {
    DistrictRecord {
      source_id: source_key(pick(record, &self.id)),
      code:      normalize(CodeKind::District, pick(record, &self.code)),
      name_th:   text(record, &self.name_th),
      name_en:   text(record, &self.name_en),
      province:  parent(record, &self.province, CodeKind::Province),
    }
  }
}

impl SubdistrictFields {
  pub fn extract(&self, record: &RawRecord) -> SubdistrictRecord {
    SubdistrictRecord {
      source_id:   source_key(pick(record, &self.id)),
      code:        normalize(CodeKind::Subdistrict, pick(record, &self.code)),
      name_th:     text(record, &self.name_th),
      name_en:     text(record, &self.name_en),
      postal_code: normalize(CodeKind::Postal, pick(record, &self.postal_code)),
      district:    parent(record, &self.district, CodeKind::District),
    }
  }
}
