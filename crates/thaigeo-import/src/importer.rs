//! The import orchestrator.
//!
//! A run walks the hierarchy parent-first in three phases. Each phase fetches
//! its whole collection, reconciles every record, and only then hands its
//! identity map to the next phase. A fetch failure ends the run; a bad record
//! only ends that record.

use std::sync::Arc;

use chrono::Utc;
use thaigeo_core::{
  code::Normalized,
  geo::{Level, LevelCounts},
  store::GeoStore,
};
use tokio::sync::Mutex;
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{
  error::{ImportError, RecordError, ResetError},
  identity::{IdentityMap, resolve_district, resolve_province},
  layout::{RawRecord, SourceLayout},
  maintenance,
  report::{ImportSummary, LevelReport},
  source::GeoSource,
  upsert::{Outcome, Upserter},
};

const DISTRICT_PROGRESS_EVERY: usize = 100;
const SUBDISTRICT_PROGRESS_EVERY: usize = 500;

/// Owns everything one import needs: the store, the source, the field layout,
/// and a guard that keeps runs (and resets) from overlapping.
pub struct Importer<S, F> {
  store:  Arc<S>,
  source: F,
  layout: SourceLayout,
  guard:  Mutex<()>,
}

impl<S, F> Importer<S, F>
where
  S: GeoStore,
  F: GeoSource,
{
  pub fn new(store: Arc<S>, source: F, layout: SourceLayout) -> Self {
    Self { store, source, layout, guard: Mutex::new(()) }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn source(&self) -> &F { &self.source }

  /// Run a full import.
  ///
  /// Fails with [`ImportError::AlreadyRunning`] if another run or a reset
  /// holds the guard; the caller should retry later rather than queue.
  pub async fn run(&self) -> Result<ImportSummary, ImportError> {
    let _guard = self
      .guard
      .try_lock()
      .map_err(|_| ImportError::AlreadyRunning)?;

    let run_id = Uuid::new_v4();
    self
      .run_phases(run_id)
      .instrument(tracing::info_span!("import", %run_id))
      .await
  }

  /// Current row counts. See [`maintenance::stats`].
  pub async fn stats(&self) -> LevelCounts { maintenance::stats(self.store.as_ref()).await }

  /// Clear all three tables. See [`maintenance::reset`].
  pub async fn reset(&self) -> Result<LevelCounts, ResetError> {
    let _guard = self.guard.try_lock().map_err(|_| ResetError::Busy)?;
    maintenance::reset(self.store.as_ref()).await
  }

  async fn run_phases(&self, run_id: Uuid) -> Result<ImportSummary, ImportError> {
    let started_at = Utc::now();
    tracing::info!("starting import");

    let (provinces, province_map) = self.import_provinces().await?;
    let (districts, mut district_map) = self.import_districts(&province_map).await?;
    let subdistricts = self.import_subdistricts(&mut district_map).await?;

    let summary = ImportSummary {
      run_id,
      started_at,
      finished_at: Utc::now(),
      provinces,
      districts,
      subdistricts,
    };
    tracing::info!(
      provinces = summary.provinces.created,
      districts = summary.districts.created,
      subdistricts = summary.subdistricts.created,
      "import finished"
    );
    Ok(summary)
  }

  async fn fetch(&self, phase: Level) -> Result<Vec<RawRecord>, ImportError> {
    tracing::info!(%phase, "fetching");
    self.source.fetch(phase).await.map_err(|source| {
      tracing::error!(%phase, error = %source, "fetch failed; aborting import");
      ImportError::Fetch { phase, source }
    })
  }

  // ── Phases ────────────────────────────────────────────────────────────────

  async fn import_provinces(&self) -> Result<(LevelReport, IdentityMap), ImportError> {
    let raws    = self.fetch(Level::Province).await?;
    let upsert  = Upserter::new(self.store.as_ref());
    let mut map = IdentityMap::new(Level::Province);
    let mut rep = LevelReport::with_total(raws.len());

    for raw in &raws {
      let rec = self.layout.provinces.extract(raw);
      warn_quality(Level::Province, "code", &rec.code, &rec.name_th);

      match upsert.province(&rec).await {
        Ok(outcome) => {
          map.insert(&rec.code.code, rec.source_id.as_deref(), outcome.id());
          rep.record(outcome);
        }
        Err(e) => skip(Level::Province, &rec.code.code, &rec.name_th, &e, &mut rep),
      }
    }

    finish(Level::Province, &rep);
    Ok((rep, map))
  }

  async fn import_districts(
    &self,
    provinces: &IdentityMap,
  ) -> Result<(LevelReport, IdentityMap), ImportError> {
    let raws    = self.fetch(Level::District).await?;
    let upsert  = Upserter::new(self.store.as_ref());
    let mut map = IdentityMap::new(Level::District);
    let mut rep = LevelReport::with_total(raws.len());

    for (i, raw) in raws.iter().enumerate() {
      let rec = self.layout.districts.extract(raw);
      warn_quality(Level::District, "code", &rec.code, &rec.name_th);

      let result = match resolve_province(provinces, &rec.province) {
        Ok(province_id) => upsert.district(&rec, province_id).await,
        Err(gap) => Err(gap),
      };

      match result {
        Ok(outcome) => {
          map.insert(&rec.code.code, rec.source_id.as_deref(), outcome.id());
          rep.record(outcome);
          if matches!(outcome, Outcome::Created(_))
            && rep.created % DISTRICT_PROGRESS_EVERY == 0
          {
            tracing::info!(created = rep.created, seen = i + 1, total = rep.total, "districts progress");
          }
        }
        Err(e) => skip(Level::District, &rec.code.code, &rec.name_th, &e, &mut rep),
      }
    }

    finish(Level::District, &rep);
    Ok((rep, map))
  }

  async fn import_subdistricts(
    &self,
    districts: &mut IdentityMap,
  ) -> Result<LevelReport, ImportError> {
    let raws    = self.fetch(Level::Subdistrict).await?;
    let store   = self.store.as_ref();
    let upsert  = Upserter::new(store);
    let mut rep = LevelReport::with_total(raws.len());

    for (i, raw) in raws.iter().enumerate() {
      let rec = self.layout.subdistricts.extract(raw);
      warn_quality(Level::Subdistrict, "code", &rec.code, &rec.name_th);
      warn_quality(Level::Subdistrict, "postal code", &rec.postal_code, &rec.name_th);

      let result = match resolve_district(store, districts, &rec.district).await {
        Ok(district_id) => upsert.subdistrict(&rec, district_id).await,
        Err(e) => Err(e),
      };

      match result {
        Ok(outcome) => {
          rep.record(outcome);
          if matches!(outcome, Outcome::Created(_))
            && rep.created % SUBDISTRICT_PROGRESS_EVERY == 0
          {
            tracing::info!(created = rep.created, seen = i + 1, total = rep.total, "subdistricts progress");
          }
        }
        Err(e) => skip(Level::Subdistrict, &rec.code.code, &rec.name_th, &e, &mut rep),
      }
    }

    finish(Level::Subdistrict, &rep);
    Ok(rep)
  }
}

// ─── Logging helpers ─────────────────────────────────────────────────────────

fn warn_quality(level: Level, field: &'static str, value: &Normalized, name: &str) {
  if let Some(w) = &value.warning {
    tracing::warn!(%level, field, code = %value.code, name, "data quality: {w}");
  }
}

fn skip(level: Level, code: &str, name: &str, error: &RecordError, rep: &mut LevelReport) {
  match error {
    RecordError::Persistence(_) => {
      tracing::error!(%level, code, name, error = %error, "record failed; skipping")
    }
    _ => tracing::warn!(%level, code, name, error = %error, "record skipped"),
  }
  rep.skip(error);
}

fn finish(level: Level, rep: &LevelReport) {
  tracing::info!(
    %level,
    created = rep.created,
    existing = rep.existing,
    repaired = rep.repaired,
    skipped = rep.skipped(),
    total = rep.total,
    "phase complete"
  );
}
