//! Measurement records and the record store
//!
//! A record is created once by a save operation, never mutated afterwards,
//! and destroyed only by an explicit delete on its `(sample_id, created_at)`
//! identity. The durable backend is a single JSON slot holding the whole
//! record sequence, rewritten wholesale on every mutation; unreadable slot
//! contents are read back as an empty sequence rather than an error.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::classify::{classify, Status};
use crate::sample_id;
use crate::time::{now, render_local};
use crate::{Error, Result};

/// One measured and classified sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Sample identifier; unique by convention only
    pub sample_id: String,
    pub height_mm: f64,
    pub width_mm: f64,
    pub length_mm: f64,
    /// Classification at save time (or an explicit override)
    pub status: Status,
    /// Creation timestamp, assigned once
    pub created_at: DateTime<Utc>,
}

/// Input to a save operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeasurement {
    /// Caller-supplied identifier; blank or absent means auto-generate
    #[serde(default)]
    pub sample_id: Option<String>,
    pub height_mm: f64,
    pub width_mm: f64,
    pub length_mm: f64,
    /// Explicit status override; absent means classify from the dimensions
    #[serde(default)]
    pub status_override: Option<Status>,
}

impl NewMeasurement {
    /// Reject non-finite dimensions before they reach the classifier.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("heightMm", self.height_mm),
            ("widthMm", self.width_mm),
            ("lengthMm", self.length_mm),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "{} must be a finite number",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Record store abstraction
///
/// Implementations own the persisted sequence exclusively; callers hold only
/// transient copies and re-fetch after any mutation.
pub trait RecordStore: Send + Sync {
    /// Current persisted sequence, in insertion order.
    fn list_all(&self) -> Result<Vec<MeasurementRecord>>;

    /// Create and persist a new record, returning it.
    fn save(&self, input: NewMeasurement) -> Result<MeasurementRecord>;

    /// Remove the first record matching both fields exactly. A no-op when
    /// nothing matches.
    fn delete_by_id(&self, sample_id: &str, created_at: DateTime<Utc>) -> Result<()>;
}

/// Build the record a save operation appends, given the current sequence.
fn make_record(
    input: &NewMeasurement,
    existing: &[MeasurementRecord],
) -> Result<MeasurementRecord> {
    input.validate()?;
    let sample_id = sample_id::generate(input.sample_id.as_deref(), existing);
    let status = input
        .status_override
        .unwrap_or_else(|| classify(input.height_mm, input.width_mm, input.length_mm));
    Ok(MeasurementRecord {
        sample_id,
        height_mm: input.height_mm,
        width_mm: input.width_mm,
        length_mm: input.length_mm,
        status,
        created_at: now(),
    })
}

fn remove_first_match(
    records: &mut Vec<MeasurementRecord>,
    sample_id: &str,
    created_at: DateTime<Utc>,
) -> bool {
    match records
        .iter()
        .position(|r| r.sample_id == sample_id && r.created_at == created_at)
    {
        Some(idx) => {
            records.remove(idx);
            true
        }
        None => false,
    }
}

/// Durable store backed by a single JSON file slot.
///
/// Every mutation rereads the slot, applies the change, and rewrites the
/// whole sequence. A process-local mutex serializes the read-modify-write
/// cycle between in-process tasks; cross-process writers remain last-writer-
/// wins on the full slot.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Slot file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lenient slot read: missing file or unparseable content is empty.
    fn read_slot(&self) -> Vec<MeasurementRecord> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_slice::<Vec<MeasurementRecord>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Unreadable measurement slot, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Wholesale slot rewrite. Write failures propagate to the caller.
    fn write_slot(&self, records: &[MeasurementRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec(records)?;
        std::fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn list_all(&self) -> Result<Vec<MeasurementRecord>> {
        Ok(self.read_slot())
    }

    fn save(&self, input: NewMeasurement) -> Result<MeasurementRecord> {
        let _guard = self.write_lock.lock().expect("slot lock poisoned");
        let mut records = self.read_slot();
        let record = make_record(&input, &records)?;
        records.push(record.clone());
        self.write_slot(&records)?;
        tracing::info!(
            sample_id = %record.sample_id,
            status = %record.status,
            "Saved measurement"
        );
        Ok(record)
    }

    fn delete_by_id(&self, sample_id: &str, created_at: DateTime<Utc>) -> Result<()> {
        let _guard = self.write_lock.lock().expect("slot lock poisoned");
        let mut records = self.read_slot();
        if remove_first_match(&mut records, sample_id, created_at) {
            self.write_slot(&records)?;
            tracing::info!(sample_id, "Deleted measurement");
        }
        Ok(())
    }
}

/// In-memory store for tests and demo runs
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<MeasurementRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<MeasurementRecord>> {
        Ok(self.records.lock().expect("store lock poisoned").clone())
    }

    fn save(&self, input: NewMeasurement) -> Result<MeasurementRecord> {
        let mut records = self.records.lock().expect("store lock poisoned");
        let record = make_record(&input, &records)?;
        records.push(record.clone());
        Ok(record)
    }

    fn delete_by_id(&self, sample_id: &str, created_at: DateTime<Utc>) -> Result<()> {
        let mut records = self.records.lock().expect("store lock poisoned");
        remove_first_match(&mut records, sample_id, created_at);
        Ok(())
    }
}

/// History filter criteria. Both parts are optional and compose with AND.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Case-insensitive substring over the identifier or the rendered local
    /// date/time string; blank matches everything
    pub search: Option<String>,
    /// Exact local-calendar-day match
    pub date: Option<NaiveDate>,
}

/// Apply a filter to a record snapshot.
pub fn filter_records(
    records: &[MeasurementRecord],
    filter: &RecordFilter,
) -> Vec<MeasurementRecord> {
    let term = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    records
        .iter()
        .filter(|r| {
            if let Some(term) = &term {
                let rendered = render_local(r.created_at);
                let matches = r.sample_id.to_lowercase().contains(term)
                    || rendered.full.to_lowercase().contains(term);
                if !matches {
                    return false;
                }
            }
            if let Some(day) = filter.date {
                if r.created_at.with_timezone(&Local).date_naive() != day {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}
