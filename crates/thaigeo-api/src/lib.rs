//! JSON REST API for the geography reference store.
//!
//! Exposes axum [`Router`]s backed by an [`Importer`] over any
//! [`GeoStore`] and [`GeoSource`]. Auth, TLS and CORS are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! [`app`] assembles the full service: `/health`, the versioned API under
//! `/api/v1`, and the unversioned legacy routes older clients still call.

pub mod error;
pub mod location;
pub mod thailand;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use serde_json::{Value, json};
use thaigeo_core::{geo::LevelCounts, store::GeoStore};
use thaigeo_import::{GeoSource, Importer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, F> {
  pub importer: Arc<Importer<S, F>>,
  /// Reference totals shown next to the live counts.
  pub expected: LevelCounts,
}

impl<S, F> Clone for AppState<S, F> {
  fn clone(&self) -> Self {
    Self {
      importer: self.importer.clone(),
      expected: self.expected,
    }
  }
}

// ─── Routers ──────────────────────────────────────────────────────────────────

/// Versioned API routes, meant to be nested under `/api/v1`.
pub fn api_router<S, F>(state: AppState<S, F>) -> Router<()>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  Router::new()
    // Location
    .route("/location/provinces", get(location::provinces::<S, F>))
    .route("/location/districts", get(location::districts::<S, F>))
    .route("/location/subdistricts", get(location::subdistricts::<S, F>))
    // Thailand bulk import
    .route("/thailand/import-all", post(thailand::import_all::<S, F>))
    .route("/thailand/stats", get(thailand::stats::<S, F>))
    .route("/thailand/clear-data", post(thailand::clear_data::<S, F>))
    .with_state(state)
}

/// Unversioned routes kept for older clients.
pub fn legacy_router<S, F>(state: AppState<S, F>) -> Router<()>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  Router::new()
    .route("/province", get(location::provinces::<S, F>))
    .route("/district", get(location::districts::<S, F>))
    .route("/subdistrict", get(location::subdistricts::<S, F>))
    .route("/import-thailand-all", post(thailand::import_all::<S, F>))
    .with_state(state)
}

/// The complete service with request tracing.
pub fn app<S, F>(state: AppState<S, F>) -> Router<()>
where
  S: GeoStore + 'static,
  F: GeoSource + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api/v1", api_router(state.clone()))
    .merge(legacy_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
