//! [`SqliteStore`], the SQLite implementation of [`GeoStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use thaigeo_core::{
  geo::{
    District, Level, NewDistrict, NewProvince, NewSubdistrict, Province, RowId, Subdistrict,
    require_code,
  },
  store::GeoStore,
};

use crate::{
  encode::{
    DISTRICT_COLUMNS, PROVINCE_COLUMNS, RawDistrict, RawProvince, RawSubdistrict,
    SUBDISTRICT_COLUMNS, encode_dt,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A geography store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a parent-link update and map "no row touched" to [`Error::NotFound`].
  async fn set_parent(
    &self,
    level:  Level,
    column: &'static str,
    id:     RowId,
    parent: RowId,
  ) -> Result<()> {
    let sql = format!("UPDATE {} SET {column} = ?1 WHERE id = ?2", level.table());

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![parent, id])?))
      .await?;

    if changed == 0 {
      return Err(Error::NotFound { level, id });
    }
    Ok(())
  }
}

// ─── GeoStore impl ───────────────────────────────────────────────────────────

impl GeoStore for SqliteStore {
  type Error = Error;

  // ── Provinces ─────────────────────────────────────────────────────────────

  async fn find_province(&self, code: &str) -> Result<Option<Province>> {
    let code = code.to_owned();

    let raw: Option<RawProvince> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROVINCE_COLUMNS} FROM provinces WHERE code = ?1"),
            rusqlite::params![code],
            RawProvince::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProvince::into_province).transpose()
  }

  async fn get_province(&self, id: RowId) -> Result<Option<Province>> {
    let raw: Option<RawProvince> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROVINCE_COLUMNS} FROM provinces WHERE id = ?1"),
            rusqlite::params![id],
            RawProvince::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProvince::into_province).transpose()
  }

  async fn create_province(&self, input: NewProvince) -> Result<Province> {
    require_code(Level::Province, &input.code)?;

    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let code       = input.code.clone();
    let name_th    = input.name_th.clone();
    let name_en    = input.name_en.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO provinces (code, name_th, name_en, created_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![code, name_th, name_en, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Province {
      id,
      code: input.code,
      name_th: input.name_th,
      name_en: input.name_en,
      created_at,
    })
  }

  async fn list_provinces(&self) -> Result<Vec<Province>> {
    let raws: Vec<RawProvince> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PROVINCE_COLUMNS} FROM provinces ORDER BY code"))?;
        let rows = stmt
          .query_map([], RawProvince::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProvince::into_province).collect()
  }

  // ── Districts ─────────────────────────────────────────────────────────────

  async fn find_district(&self, code: &str) -> Result<Option<District>> {
    let code = code.to_owned();

    let raw: Option<RawDistrict> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {DISTRICT_COLUMNS} FROM districts WHERE code = ?1"),
            rusqlite::params![code],
            RawDistrict::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDistrict::into_district).transpose()
  }

  async fn get_district(&self, id: RowId) -> Result<Option<District>> {
    let raw: Option<RawDistrict> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {DISTRICT_COLUMNS} FROM districts WHERE id = ?1"),
            rusqlite::params![id],
            RawDistrict::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDistrict::into_district).transpose()
  }

  async fn create_district(&self, input: NewDistrict) -> Result<District> {
    require_code(Level::District, &input.code)?;

    let created_at  = Utc::now();
    let at_str      = encode_dt(created_at);
    let code        = input.code.clone();
    let name_th     = input.name_th.clone();
    let name_en     = input.name_en.clone();
    let province_id = input.province_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO districts (code, name_th, name_en, province_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![code, name_th, name_en, province_id, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(District {
      id,
      code: input.code,
      name_th: input.name_th,
      name_en: input.name_en,
      province_id,
      created_at,
    })
  }

  async fn set_district_province(&self, id: RowId, province_id: RowId) -> Result<()> {
    self
      .set_parent(Level::District, "province_id", id, province_id)
      .await
  }

  async fn list_districts(&self, province_id: Option<RowId>) -> Result<Vec<District>> {
    let raws: Vec<RawDistrict> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(p) = province_id {
          let mut stmt = conn.prepare(&format!(
            "SELECT {DISTRICT_COLUMNS} FROM districts WHERE province_id = ?1 ORDER BY code"
          ))?;
          stmt
            .query_map(rusqlite::params![p], RawDistrict::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("SELECT {DISTRICT_COLUMNS} FROM districts ORDER BY code"))?;
          stmt
            .query_map([], RawDistrict::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDistrict::into_district).collect()
  }

  // ── Subdistricts ──────────────────────────────────────────────────────────

  async fn find_subdistrict(&self, code: &str) -> Result<Option<Subdistrict>> {
    let code = code.to_owned();

    let raw: Option<RawSubdistrict> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SUBDISTRICT_COLUMNS} FROM subdistricts WHERE code = ?1"),
            rusqlite::params![code],
            RawSubdistrict::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubdistrict::into_subdistrict).transpose()
  }

  async fn create_subdistrict(&self, input: NewSubdistrict) -> Result<Subdistrict> {
    require_code(Level::Subdistrict, &input.code)?;

    let created_at  = Utc::now();
    let at_str      = encode_dt(created_at);
    let code        = input.code.clone();
    let name_th     = input.name_th.clone();
    let name_en     = input.name_en.clone();
    let postal_code = input.postal_code.clone();
    let district_id = input.district_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subdistricts (code, name_th, name_en, postal_code, district_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![code, name_th, name_en, postal_code, district_id, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Subdistrict {
      id,
      code: input.code,
      name_th: input.name_th,
      name_en: input.name_en,
      postal_code: input.postal_code,
      district_id,
      created_at,
    })
  }

  async fn set_subdistrict_district(&self, id: RowId, district_id: RowId) -> Result<()> {
    self
      .set_parent(Level::Subdistrict, "district_id", id, district_id)
      .await
  }

  async fn list_subdistricts(&self, district_id: Option<RowId>) -> Result<Vec<Subdistrict>> {
    let raws: Vec<RawSubdistrict> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(d) = district_id {
          let mut stmt = conn.prepare(&format!(
            "SELECT {SUBDISTRICT_COLUMNS} FROM subdistricts WHERE district_id = ?1 ORDER BY code"
          ))?;
          stmt
            .query_map(rusqlite::params![d], RawSubdistrict::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn
            .prepare(&format!("SELECT {SUBDISTRICT_COLUMNS} FROM subdistricts ORDER BY code"))?;
          stmt
            .query_map([], RawSubdistrict::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubdistrict::into_subdistrict).collect()
  }

  // ── Maintenance ───────────────────────────────────────────────────────────

  async fn count(&self, level: Level) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", level.table());

    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |r| r.get(0))?))
      .await?;

    Ok(n.max(0) as u64)
  }

  async fn delete_all(&self, level: Level) -> Result<u64> {
    let sql = format!("DELETE FROM {}", level.table());

    let n = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, [])?))
      .await?;

    Ok(n as u64)
  }
}
