//! The reconciling upserter.
//!
//! Existence is always decided by canonical code, never by source identifier.
//! A missing row is created; an existing row is left exactly as it is, except
//! that a null parent link is backfilled.

use thaigeo_core::{
  geo::{Level, NewDistrict, NewProvince, NewSubdistrict, RowId, require_code},
  store::GeoStore,
};

use crate::{
  error::RecordError,
  layout::{DistrictRecord, ProvinceRecord, SubdistrictRecord},
};

/// What reconciling one record did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Created(RowId),
  Existing(RowId),
  /// The row existed without a parent link and the link was set.
  Repaired(RowId),
}

impl Outcome {
  pub fn id(self) -> RowId {
    match self {
      Outcome::Created(id) | Outcome::Existing(id) | Outcome::Repaired(id) => id,
    }
  }
}

/// Reconciles normalized records into a [`GeoStore`].
pub struct Upserter<'s, S> {
  store: &'s S,
}

impl<'s, S: GeoStore> Upserter<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  pub async fn province(&self, rec: &ProvinceRecord) -> Result<Outcome, RecordError> {
    let code = &rec.code.code;
    require_code(Level::Province, code).map_err(|_| RecordError::Invalid(Level::Province))?;

    if let Some(existing) = self
      .store
      .find_province(code)
      .await
      .map_err(RecordError::store)?
    {
      return Ok(Outcome::Existing(existing.id));
    }

    let created = self
      .store
      .create_province(NewProvince {
        code:    code.clone(),
        name_th: rec.name_th.clone(),
        name_en: rec.name_en.clone(),
      })
      .await
      .map_err(RecordError::store)?;
    Ok(Outcome::Created(created.id))
  }

  pub async fn district(
    &self,
    rec:         &DistrictRecord,
    province_id: RowId,
  ) -> Result<Outcome, RecordError> {
    let code = &rec.code.code;
    require_code(Level::District, code).map_err(|_| RecordError::Invalid(Level::District))?;

    if let Some(existing) = self
      .store
      .find_district(code)
      .await
      .map_err(RecordError::store)?
    {
      return match existing.province_id {
        Some(current) => {
          if current != province_id {
            tracing::debug!(
              district = %code,
              current,
              source = province_id,
              "existing district has a different province; left untouched"
            );
          }
          Ok(Outcome::Existing(existing.id))
        }
        None => {
          self
            .store
            .set_district_province(existing.id, province_id)
            .await
            .map_err(RecordError::store)?;
          Ok(Outcome::Repaired(existing.id))
        }
      };
    }

    let created = self
      .store
      .create_district(NewDistrict {
        code:        code.clone(),
        name_th:     rec.name_th.clone(),
        name_en:     rec.name_en.clone(),
        province_id: Some(province_id),
      })
      .await
      .map_err(RecordError::store)?;
    Ok(Outcome::Created(created.id))
  }

  pub async fn subdistrict(
    &self,
    rec:         &SubdistrictRecord,
    district_id: RowId,
  ) -> Result<Outcome, RecordError> {
    let code = &rec.code.code;
    require_code(Level::Subdistrict, code)
      .map_err(|_| RecordError::Invalid(Level::Subdistrict))?;

    if let Some(existing) = self
      .store
      .find_subdistrict(code)
      .await
      .map_err(RecordError::store)?
    {
      if existing.district_id.is_some() {
        return Ok(Outcome::Existing(existing.id));
      }
      self
        .store
        .set_subdistrict_district(existing.id, district_id)
        .await
        .map_err(RecordError::store)?;
      return Ok(Outcome::Repaired(existing.id));
    }

    let created = self
      .store
      .create_subdistrict(NewSubdistrict {
        code:        code.clone(),
        name_th:     rec.name_th.clone(),
        name_en:     rec.name_en.clone(),
        postal_code: rec.postal_code.code.clone(),
        district_id: Some(district_id),
      })
      .await
      .map_err(RecordError::store)?;
    Ok(Outcome::Created(created.id))
  }
}
