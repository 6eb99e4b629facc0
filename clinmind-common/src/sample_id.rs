//! Sample identifier generation
//!
//! Auto-generated identifiers take the form `4827-<letter>`, where the letter
//! walks A-Z by counting how many identifiers with the same numeric prefix
//! already exist. After 26 auto-generated identifiers the letter wraps back
//! to A, so duplicates are possible; `(sample_id, created_at)` remains the
//! identity used for deletion, and the wraparound is kept as-is.

use crate::records::MeasurementRecord;

/// Fixed numeric prefix for auto-generated identifiers
pub const BASE_NUMBER: u32 = 4827;

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Derive the identifier for a new record.
///
/// A non-blank `existing` value (after trimming) is the user's own identifier
/// and is returned verbatim. Otherwise the next letter in the `4827-` series
/// is selected from the current store contents.
pub fn generate(existing: Option<&str>, records: &[MeasurementRecord]) -> String {
    if let Some(id) = existing {
        let trimmed = id.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let prefix = format!("{}-", BASE_NUMBER);
    let next_index = records
        .iter()
        .filter(|r| r.sample_id.starts_with(&prefix))
        .count();
    let letter = LETTERS[next_index % LETTERS.len()] as char;
    format!("{}{}", prefix, letter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Status;
    use chrono::Utc;

    fn record_with_id(sample_id: &str) -> MeasurementRecord {
        MeasurementRecord {
            sample_id: sample_id.to_string(),
            height_mm: 10.0,
            width_mm: 25.0,
            length_mm: 30.0,
            status: Status::Ok,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_identifier_wins_verbatim() {
        assert_eq!(generate(Some("LAB-001"), &[]), "LAB-001");
    }

    #[test]
    fn test_user_identifier_is_trimmed() {
        assert_eq!(generate(Some("  LAB-001  "), &[]), "LAB-001");
    }

    #[test]
    fn test_blank_identifier_falls_through_to_generation() {
        assert_eq!(generate(Some("   "), &[]), "4827-A");
        assert_eq!(generate(None, &[]), "4827-A");
    }

    #[test]
    fn test_sequence_advances_per_prefixed_record() {
        let records = vec![record_with_id("4827-A"), record_with_id("4827-B")];
        assert_eq!(generate(None, &records), "4827-C");
    }

    #[test]
    fn test_foreign_identifiers_do_not_advance_sequence() {
        let records = vec![record_with_id("LAB-001"), record_with_id("4827-A")];
        assert_eq!(generate(None, &records), "4827-B");
    }

    #[test]
    fn test_wraparound_after_z() {
        // 26 prefixed records exhaust the alphabet; the 27th repeats "4827-A".
        let records: Vec<MeasurementRecord> = (0..26)
            .map(|i| record_with_id(&format!("4827-{}", (b'A' + i as u8) as char)))
            .collect();
        assert_eq!(generate(None, &records), "4827-A");
    }
}
