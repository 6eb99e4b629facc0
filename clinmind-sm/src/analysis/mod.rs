//! Image measurement analysis
//!
//! Converts a captured sample photo into three estimated dimensions, either
//! through the remote generative model or a deterministic local stand-in.
//! Callers get a typed, user-displayable failure; no retries are performed
//! here, re-attempting a capture is the user's decision.

pub mod gemini;
pub mod local;

pub use gemini::GeminiAnalyzer;
pub use local::LocalAnalyzer;

use serde::Serialize;
use thiserror::Error;

/// Largest accepted decoded image payload
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Estimated sample dimensions in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub height_mm: f64,
    pub width_mm: f64,
    pub length_mm: f64,
}

/// One analysis outcome: the estimate plus an operator-facing note
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub dimensions: Dimensions,
    pub explanation: Option<String>,
}

/// Analysis failures. Display strings are the user-facing messages shown by
/// the capture screen; technical context rides in `details` where present.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing or unusable image payload
    #[error("Imagem ausente ou inválida. Envie o base64 da foto.")]
    InvalidImage,

    /// Payload over [`MAX_IMAGE_BYTES`]
    #[error("Imagem grande demais. Envie uma foto menor.")]
    PayloadTooLarge,

    /// Remote model errored or returned content we could not interpret
    #[error("Modelo indisponível no momento. Tente mais tarde.")]
    ServiceUnavailable { details: String },

    /// Remote analysis requested without a configured credential
    #[error("Chave de API ausente no servidor.")]
    ServerMisconfigured,

    /// Anything else
    #[error("Erro interno ao processar sua solicitação.")]
    Unknown { details: String },
}

/// Analyzer selection, fixed at startup from the configured credential
pub enum Analyzer {
    /// Deterministic stand-in for environments without a remote credential
    Local(LocalAnalyzer),
    /// Remote generative model
    Gemini(GeminiAnalyzer),
}

impl Analyzer {
    pub fn local() -> Self {
        Analyzer::Local(LocalAnalyzer)
    }

    pub fn gemini(api_key: String) -> Self {
        Analyzer::Gemini(GeminiAnalyzer::new(api_key))
    }

    /// Estimate the three dimensions of the sample in `image`.
    ///
    /// `prompt` overrides the default instruction sent to the remote model;
    /// the local analyzer ignores it.
    pub async fn analyze(
        &self,
        image: &[u8],
        prompt: Option<&str>,
    ) -> Result<Analysis, AnalysisError> {
        if image.is_empty() {
            return Err(AnalysisError::InvalidImage);
        }
        if image.len() > MAX_IMAGE_BYTES {
            return Err(AnalysisError::PayloadTooLarge);
        }
        match self {
            Analyzer::Local(local) => Ok(local.analyze(image)),
            Analyzer::Gemini(client) => client.analyze(image, prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_payload_is_invalid() {
        let analyzer = Analyzer::local();
        let result = analyzer.analyze(&[], None).await;
        assert!(matches!(result, Err(AnalysisError::InvalidImage)));
    }

    #[tokio::test]
    async fn test_oversized_payload_is_rejected() {
        let analyzer = Analyzer::local();
        let image = vec![0u8; MAX_IMAGE_BYTES + 1];
        let result = analyzer.analyze(&image, None).await;
        assert!(matches!(result, Err(AnalysisError::PayloadTooLarge)));
    }

    #[tokio::test]
    async fn test_local_analysis_is_deterministic() {
        let analyzer = Analyzer::local();
        let image = b"fake jpeg bytes".to_vec();
        let first = analyzer.analyze(&image, None).await.unwrap();
        let second = analyzer.analyze(&image, None).await.unwrap();
        assert_eq!(first, second);
    }
}
