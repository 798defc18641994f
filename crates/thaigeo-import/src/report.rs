//! Per-level counters and the run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thaigeo_core::geo::Level;
use uuid::Uuid;

use crate::{error::RecordError, upsert::Outcome};

/// Counters for one level of one run.
///
/// `total` is the number of records in the source collection; every record
/// lands in exactly one of the other counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelReport {
  pub total:      usize,
  pub created:    usize,
  pub existing:   usize,
  pub repaired:   usize,
  pub unresolved: usize,
  pub invalid:    usize,
  pub failed:     usize,
}

impl LevelReport {
  pub fn with_total(total: usize) -> Self { Self { total, ..Self::default() } }

  pub fn record(&mut self, outcome: Outcome) {
    match outcome {
      Outcome::Created(_) => self.created += 1,
      Outcome::Existing(_) => self.existing += 1,
      Outcome::Repaired(_) => self.repaired += 1,
    }
  }

  pub fn skip(&mut self, error: &RecordError) {
    match error {
      RecordError::Invalid(_) => self.invalid += 1,
      RecordError::ResolutionGap { .. } => self.unresolved += 1,
      RecordError::Persistence(_) => self.failed += 1,
    }
  }

  /// Records that did not end up backed by a row.
  pub fn skipped(&self) -> usize { self.unresolved + self.invalid + self.failed }
}

/// Result of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
  pub run_id:       Uuid,
  pub started_at:   DateTime<Utc>,
  pub finished_at:  DateTime<Utc>,
  pub provinces:    LevelReport,
  pub districts:    LevelReport,
  pub subdistricts: LevelReport,
}

impl ImportSummary {
  pub fn level(&self, level: Level) -> &LevelReport {
    match level {
      Level::Province => &self.provinces,
      Level::District => &self.districts,
      Level::Subdistrict => &self.subdistricts,
    }
  }
}
