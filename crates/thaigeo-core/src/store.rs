//! The `GeoStore` trait.
//!
//! Implemented by storage backends (e.g. `thaigeo-store-sqlite`). The importer
//! and the HTTP layer depend on this abstraction, never on a concrete backend,
//! so the store handle is always passed in explicitly.

use std::future::Future;

use crate::geo::{
  District, Level, NewDistrict, NewProvince, NewSubdistrict, Province, RowId, Subdistrict,
};

/// Abstraction over a geography reference store.
///
/// Canonical codes are unique per level. Rows are never updated except for
/// their parent link, and are only removed wholesale with
/// [`GeoStore::delete_all`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait GeoStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Provinces ─────────────────────────────────────────────────────────

  /// Look a province up by its canonical two-digit code.
  fn find_province<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Province>, Self::Error>> + Send + 'a;

  fn get_province(
    &self,
    id: RowId,
  ) -> impl Future<Output = Result<Option<Province>, Self::Error>> + Send + '_;

  /// Persist a new province. Fails if the code is already taken.
  fn create_province(
    &self,
    input: NewProvince,
  ) -> impl Future<Output = Result<Province, Self::Error>> + Send + '_;

  fn list_provinces(
    &self,
  ) -> impl Future<Output = Result<Vec<Province>, Self::Error>> + Send + '_;

  // ── Districts ─────────────────────────────────────────────────────────

  fn find_district<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<District>, Self::Error>> + Send + 'a;

  fn get_district(
    &self,
    id: RowId,
  ) -> impl Future<Output = Result<Option<District>, Self::Error>> + Send + '_;

  fn create_district(
    &self,
    input: NewDistrict,
  ) -> impl Future<Output = Result<District, Self::Error>> + Send + '_;

  /// Set the parent link of an existing district. Touches no other column.
  fn set_district_province(
    &self,
    id: RowId,
    province_id: RowId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List districts, optionally restricted to one province.
  fn list_districts(
    &self,
    province_id: Option<RowId>,
  ) -> impl Future<Output = Result<Vec<District>, Self::Error>> + Send + '_;

  // ── Subdistricts ──────────────────────────────────────────────────────

  fn find_subdistrict<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Subdistrict>, Self::Error>> + Send + 'a;

  fn create_subdistrict(
    &self,
    input: NewSubdistrict,
  ) -> impl Future<Output = Result<Subdistrict, Self::Error>> + Send + '_;

  /// Set the parent link of an existing subdistrict. Touches no other column.
  fn set_subdistrict_district(
    &self,
    id: RowId,
    district_id: RowId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List subdistricts, optionally restricted to one district.
  fn list_subdistricts(
    &self,
    district_id: Option<RowId>,
  ) -> impl Future<Output = Result<Vec<Subdistrict>, Self::Error>> + Send + '_;

  // ── Maintenance ───────────────────────────────────────────────────────

  /// Number of rows at `level`.
  fn count(&self, level: Level) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Delete every row at `level` and return how many were removed.
  ///
  /// Fails while rows at a lower level still reference this one, so callers
  /// must clear children first.
  fn delete_all(
    &self,
    level: Level,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
