use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    gp::{parse_gp, GpParseError},
    overrides::{apply_path, FieldError, FieldPath},
    report::{compute_at, Report},
    snapshot::{PriceSnapshot, Provenance},
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Format(#[from] GpParseError),
    #[error("{field} cannot be negative (got {value})")]
    Negative { field: String, value: i64 },
}

/// Snapshot and provenance as one unit: what the dashboard shows and what the
/// cache stores.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    pub snapshot: PriceSnapshot,
    pub provenance: Provenance,
}

impl AppState {
    pub fn new(snapshot: PriceSnapshot, provenance: Provenance) -> Self {
        Self {
            snapshot,
            provenance,
        }
    }

    /// Full edit pipeline for raw user input: field path, GP text, non-negative
    /// check, field update, provenance switch. Nothing changes on error.
    pub fn apply_edit(&mut self, field: &str, raw_value: &str) -> Result<FieldPath, EditError> {
        let path = FieldPath::parse(field)?;
        let value = parse_gp(raw_value)?;
        self.apply_value(path, value)?;
        Ok(path)
    }

    /// Applies an already-parsed value. Negative amounts are refused here
    /// because every caller of this method is user-facing.
    pub fn apply_value(&mut self, path: FieldPath, value: i64) -> Result<(), EditError> {
        if value < 0 {
            return Err(EditError::Negative {
                field: path.to_string(),
                value,
            });
        }
        apply_path(&mut self.snapshot, path, value)?;
        self.provenance.mark_manual();
        Ok(())
    }

    pub fn replace_with_fetch(&mut self, snapshot: PriceSnapshot, provenance: Provenance) {
        self.snapshot = snapshot;
        self.provenance = provenance;
    }

    pub fn report(&self, now: SystemTime) -> Report {
        compute_at(&self.snapshot, &self.provenance, now)
    }

    pub fn apply_record(&mut self, record: CacheRecord) {
        self.snapshot = record.snapshot;
        self.provenance = record.provenance;
    }

    pub fn to_record(&self) -> CacheRecord {
        CacheRecord {
            snapshot: self.snapshot.clone(),
            provenance: self.provenance,
        }
    }
}

impl From<CacheRecord> for AppState {
    fn from(record: CacheRecord) -> Self {
        Self::new(record.snapshot, record.provenance)
    }
}

/// On-disk form of the single cache slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub snapshot: PriceSnapshot,
    #[serde(default)]
    pub provenance: Provenance,
}
