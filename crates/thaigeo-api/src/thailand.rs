//! Handlers for the `/thailand` maintenance endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/thailand/import-all` | Runs a full import; 409 while one is running |
//! | `GET`  | `/thailand/stats` | Row counts next to the expected totals |
//! | `POST` | `/thailand/clear-data` | Deletes subdistricts, districts, then provinces |

use axum::{Json, extract::State};
use serde::Serialize;
use thaigeo_core::{geo::LevelCounts, store::GeoStore};
use thaigeo_import::{GeoSource, ImportSummary};

use crate::{AppState, error::ApiError};

// ─── Import ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ImportResponse {
  pub message: &'static str,
  pub summary: ImportSummary,
}

/// `POST /thailand/import-all`
pub async fn import_all<S, F>(
  State(state): State<AppState<S, F>>,
) -> Result<Json<ImportResponse>, ApiError>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  let summary = state.importer.run().await?;
  Ok(Json(ImportResponse {
    message: "Thailand geography import completed",
    summary,
  }))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatsResponse {
  pub stats:    LevelCounts,
  pub expected: LevelCounts,
}

/// `GET /thailand/stats`
pub async fn stats<S, F>(State(state): State<AppState<S, F>>) -> Json<StatsResponse>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  Json(StatsResponse {
    stats:    state.importer.stats().await,
    expected: state.expected,
  })
}

// ─── Clear ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ClearResponse {
  pub message: &'static str,
  pub deleted: LevelCounts,
}

/// `POST /thailand/clear-data`
pub async fn clear_data<S, F>(
  State(state): State<AppState<S, F>>,
) -> Result<Json<ClearResponse>, ApiError>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  let deleted = state.importer.reset().await?;
  Ok(Json(ClearResponse {
    message: "Cleared all Thailand geography data",
    deleted,
  }))
}
