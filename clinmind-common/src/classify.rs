//! Sample classification against reference measurement bands
//!
//! A sample's three dimensions are each checked against a fixed reference
//! band; the per-dimension results aggregate into a single tri-state status.

use serde::{Deserialize, Serialize};

/// Overall classification of a measured sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// All three dimensions inside their reference bands
    #[serde(rename = "OK")]
    Ok,
    /// At least one dimension in the tolerance margin, none beyond it
    #[serde(rename = "Warning")]
    Warning,
    /// At least one dimension beyond the tolerance margin
    #[serde(rename = "OutOfRange")]
    OutOfRange,
}

impl Status {
    /// Display label as shown in reports and the history screen
    pub fn label_pt_br(&self) -> &'static str {
        match self {
            Status::Ok => "Padrão OK",
            Status::Warning => "Atenção",
            Status::OutOfRange => "Fora do Padrão",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Ok => "OK",
            Status::Warning => "Warning",
            Status::OutOfRange => "OutOfRange",
        };
        f.write_str(s)
    }
}

/// Acceptable `[min, max]` range for one dimension, in millimeters
#[derive(Debug, Clone, Copy)]
pub struct ReferenceBand {
    pub min: f64,
    pub max: f64,
}

/// Reference band for sample height
pub const HEIGHT_BAND: ReferenceBand = ReferenceBand { min: 8.0, max: 12.0 };
/// Reference band for sample width
pub const WIDTH_BAND: ReferenceBand = ReferenceBand { min: 20.0, max: 30.0 };
/// Reference band for sample length
pub const LENGTH_BAND: ReferenceBand = ReferenceBand { min: 25.0, max: 35.0 };

/// Tolerance multipliers widening a reference band into the warning band
const TOLERANCE_LOW: f64 = 0.9;
const TOLERANCE_HIGH: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DimCheck {
    Ok,
    Warn,
    Error,
}

fn check_dim(value: f64, band: ReferenceBand) -> DimCheck {
    if value >= band.min && value <= band.max {
        return DimCheck::Ok;
    }
    if value >= band.min * TOLERANCE_LOW && value <= band.max * TOLERANCE_HIGH {
        return DimCheck::Warn;
    }
    DimCheck::Error
}

/// Classify a sample from its three dimensions (millimeters).
///
/// Aggregation precedence:
/// 1. all three dimensions ok → `Status::Ok`
/// 2. no dimension in error and at least one in warning → `Status::Warning`
/// 3. otherwise → `Status::OutOfRange`
///
/// Pure and total over finite inputs. Callers must reject non-finite values
/// before calling; NaN compares false against every band bound and would be
/// reported as out of range.
pub fn classify(height_mm: f64, width_mm: f64, length_mm: f64) -> Status {
    let h = check_dim(height_mm, HEIGHT_BAND);
    let w = check_dim(width_mm, WIDTH_BAND);
    let l = check_dim(length_mm, LENGTH_BAND);

    if h == DimCheck::Ok && w == DimCheck::Ok && l == DimCheck::Ok {
        return Status::Ok;
    }
    let any_error = h == DimCheck::Error || w == DimCheck::Error || l == DimCheck::Error;
    if !any_error {
        return Status::Warning;
    }
    Status::OutOfRange
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_dimensions_at_band_minimum() {
        assert_eq!(classify(8.0, 20.0, 25.0), Status::Ok);
    }

    #[test]
    fn test_all_dimensions_at_band_maximum() {
        assert_eq!(classify(12.0, 30.0, 35.0), Status::Ok);
    }

    #[test]
    fn test_nominal_sample_is_ok() {
        assert_eq!(classify(10.0, 25.0, 30.0), Status::Ok);
    }

    #[test]
    fn test_height_at_tolerance_floor_is_warning() {
        // 7.2 == 8 * 0.9, inclusive tolerance bound
        assert_eq!(classify(7.2, 20.0, 25.0), Status::Warning);
    }

    #[test]
    fn test_height_below_tolerance_floor_is_out_of_range() {
        assert_eq!(classify(7.19, 20.0, 25.0), Status::OutOfRange);
    }

    #[test]
    fn test_single_error_dimension_dominates() {
        // Height 30mm is far above 12 * 1.1 = 13.2; width and length are ok.
        assert_eq!(classify(30.0, 20.0, 25.0), Status::OutOfRange);
    }

    #[test]
    fn test_warn_and_error_mix_is_out_of_range() {
        // Width in the warning margin, length beyond tolerance.
        assert_eq!(classify(10.0, 19.0, 50.0), Status::OutOfRange);
    }

    #[test]
    fn test_tolerance_ceiling_is_warning() {
        // 13.2 == 12 * 1.1
        assert_eq!(classify(13.2, 25.0, 30.0), Status::Warning);
        assert_eq!(classify(13.21, 25.0, 30.0), Status::OutOfRange);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&Status::Ok).unwrap(), "\"OK\"");
        assert_eq!(serde_json::to_string(&Status::Warning).unwrap(), "\"Warning\"");
        assert_eq!(
            serde_json::to_string(&Status::OutOfRange).unwrap(),
            "\"OutOfRange\""
        );
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Ok.label_pt_br(), "Padrão OK");
        assert_eq!(Status::Warning.label_pt_br(), "Atenção");
        assert_eq!(Status::OutOfRange.label_pt_br(), "Fora do Padrão");
    }
}
