//! # ClinMind Common Library
//!
//! Shared code for the ClinMind sample measurement service including:
//! - Measurement record model and store abstraction
//! - Classification engine (reference/tolerance bands)
//! - Sample identifier generation
//! - Configuration loading
//! - Timestamp utilities

pub mod classify;
pub mod config;
pub mod error;
pub mod records;
pub mod sample_id;
pub mod time;

pub use classify::{classify, Status};
pub use error::{Error, Result};
pub use records::{
    filter_records, JsonFileStore, MeasurementRecord, MemoryStore, NewMeasurement, RecordFilter,
    RecordStore,
};
