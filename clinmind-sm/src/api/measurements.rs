//! Measurement history endpoints
//!
//! List (with history filters), create, and delete-by-identity. Records are
//! immutable once saved; the front end re-fetches the list after any
//! mutation instead of patching its local copy.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use clinmind_common::records::{filter_records, MeasurementRecord, NewMeasurement, RecordFilter};
use clinmind_common::Error as CommonError;

use crate::AppState;

/// Query parameters for the history listing
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Case-insensitive substring over identifier or rendered date/time
    pub search: Option<String>,

    /// Exact local calendar day, `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Query parameters identifying one record for deletion
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub sample_id: String,

    /// RFC 3339 creation timestamp, matched exactly
    pub created_at: String,
}

/// GET /api/measurements?search=&date=
///
/// Returns the persisted history in insertion order, narrowed by the
/// optional filters. A blank search term matches everything.
pub async fn list_measurements(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MeasurementRecord>>, MeasurementError> {
    let date = match query.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| MeasurementError::InvalidDate(raw.to_string()))?,
        ),
        None => None,
    };

    let records = state.store.list_all().map_err(MeasurementError::from)?;
    let filter = RecordFilter {
        search: query.search,
        date,
    };
    Ok(Json(filter_records(&records, &filter)))
}

/// POST /api/measurements
///
/// Saves one classified measurement and returns it. The identifier is
/// generated when absent; the status is computed from the dimensions unless
/// an explicit override is supplied. Non-finite dimensions are rejected
/// before anything is persisted.
pub async fn create_measurement(
    State(state): State<AppState>,
    Json(input): Json<NewMeasurement>,
) -> Result<(StatusCode, Json<MeasurementRecord>), MeasurementError> {
    input.validate().map_err(MeasurementError::from)?;
    let record = state.store.save(input).map_err(MeasurementError::from)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/measurements?sample_id=&created_at=
///
/// Removes the record matching both fields exactly. Always answers 204;
/// deleting a record that does not exist is not an error.
pub async fn delete_measurement(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, MeasurementError> {
    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&query.created_at)
        .map_err(|_| MeasurementError::InvalidTimestamp(query.created_at.clone()))?
        .with_timezone(&Utc);

    state
        .store
        .delete_by_id(&query.sample_id, created_at)
        .map_err(MeasurementError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Measurement endpoint errors
#[derive(Debug)]
pub enum MeasurementError {
    InvalidInput(String),
    InvalidDate(String),
    InvalidTimestamp(String),
    Storage(String),
}

impl From<CommonError> for MeasurementError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::InvalidInput(msg) => MeasurementError::InvalidInput(msg),
            other => MeasurementError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for MeasurementError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MeasurementError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            MeasurementError::InvalidDate(raw) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid date filter (must be YYYY-MM-DD): {}", raw),
            ),
            MeasurementError::InvalidTimestamp(raw) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid created_at (must be RFC 3339): {}", raw),
            ),
            MeasurementError::Storage(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
