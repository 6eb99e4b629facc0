//! Local deterministic analyzer
//!
//! Stand-in for the remote model in environments without a configured
//! credential. Produces a stable-but-varying estimate derived from the image
//! payload itself, so development and tests get repeatable values per image
//! without network access. Never hard-fails on a non-empty payload.

use super::{Analysis, Dimensions};

/// Deterministic pseudo-measurement generator
pub struct LocalAnalyzer;

/// Payload bytes folded into the seed hash
const HASH_WINDOW: usize = 200;

impl LocalAnalyzer {
    /// Derive three dimensions from the payload.
    ///
    /// Output ranges: height 10-40mm, width 20-70mm, length 30-100mm, each
    /// rounded to 0.1mm.
    pub fn analyze(&self, image: &[u8]) -> Analysis {
        let mut hash: u32 = 0;
        for &byte in image.iter().take(HASH_WINDOW) {
            hash = hash.wrapping_mul(31).wrapping_add(byte as u32);
        }
        let base = (hash % 1000) as f64 / 10.0;

        let height_mm = round_tenth(10.0 + base % 30.0);
        let width_mm = round_tenth(20.0 + (base / 2.0) % 50.0);
        let length_mm = round_tenth(30.0 + (base / 3.0) % 70.0);

        tracing::debug!(height_mm, width_mm, length_mm, "Local analysis result");

        Analysis {
            dimensions: Dimensions {
                height_mm,
                width_mm,
                length_mm,
            },
            explanation: Some(
                "Resposta simulada (varia conforme imagem) em ambiente local.".to_string(),
            ),
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_payload_same_estimate() {
        let analyzer = LocalAnalyzer;
        let a = analyzer.analyze(b"payload");
        let b = analyzer.analyze(b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_payloads_vary() {
        let analyzer = LocalAnalyzer;
        let a = analyzer.analyze(b"first image payload");
        let b = analyzer.analyze(b"second image payload");
        assert_ne!(a.dimensions, b.dimensions);
    }

    #[test]
    fn test_estimates_stay_in_documented_ranges() {
        let analyzer = LocalAnalyzer;
        for seed in 0u32..50 {
            let payload: Vec<u8> = (0..64).map(|i| (seed as u8).wrapping_add(i)).collect();
            let result = analyzer.analyze(&payload).dimensions;
            assert!((10.0..=40.0).contains(&result.height_mm));
            assert!((20.0..=70.0).contains(&result.width_mm));
            assert!((30.0..=100.0).contains(&result.length_mm));
        }
    }

    #[test]
    fn test_only_leading_window_feeds_the_hash() {
        let analyzer = LocalAnalyzer;
        let mut long_a = vec![7u8; 400];
        let mut long_b = vec![7u8; 400];
        long_a[350] = 1;
        long_b[350] = 2;
        // Differences past the hash window do not change the estimate.
        assert_eq!(analyzer.analyze(&long_a), analyzer.analyze(&long_b));
    }
}
