//! Read-only handlers for `/location`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/location/provinces` | All provinces, by code |
//! | `GET`  | `/location/districts` | Optional `?province_id=` |
//! | `GET`  | `/location/subdistricts` | Optional `?district_id=` |

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Deserializer, Serialize};
use thaigeo_core::{
  geo::{District, Province, RowId, Subdistrict},
  store::GeoStore,
};
use thaigeo_import::GeoSource;

use crate::{AppState, error::ApiError};

/// Envelope shared by every listing.
#[derive(Debug, Serialize)]
pub struct Data<T> {
  pub data: Vec<T>,
}

/// `GET /location/provinces`
pub async fn provinces<S, F>(
  State(state): State<AppState<S, F>>,
) -> Result<Json<Data<Province>>, ApiError>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  let data = state
    .importer
    .store()
    .list_provinces()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(Data { data }))
}

#[derive(Debug, Deserialize)]
pub struct DistrictParams {
  #[serde(default, deserialize_with = "optional_id")]
  pub province_id: Option<RowId>,
}

/// `GET /location/districts[?province_id=<id>]`
pub async fn districts<S, F>(
  State(state): State<AppState<S, F>>,
  params: Result<Query<DistrictParams>, QueryRejection>,
) -> Result<Json<Data<District>>, ApiError>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  let Query(params) = params?;
  let data = state
    .importer
    .store()
    .list_districts(params.province_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(Data { data }))
}

#[derive(Debug, Deserialize)]
pub struct SubdistrictParams {
  #[serde(default, deserialize_with = "optional_id")]
  pub district_id: Option<RowId>,
}

/// `GET /location/subdistricts[?district_id=<id>]`
pub async fn subdistricts<S, F>(
  State(state): State<AppState<S, F>>,
  params: Result<Query<SubdistrictParams>, QueryRejection>,
) -> Result<Json<Data<Subdistrict>>, ApiError>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  let Query(params) = params?;
  let data = state
    .importer
    .store()
    .list_subdistricts(params.district_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(Data { data }))
}

/// An empty filter (`?province_id=`) means no filter.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<RowId>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<String>::deserialize(deserializer)?;
  match raw.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
  }
}
