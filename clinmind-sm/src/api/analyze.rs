//! Image analysis endpoint
//!
//! Accepts a base64 photo, runs the configured analyzer, and answers with
//! the three estimated dimensions. Failures map onto the statuses the front
//! end already understands: 422 missing image, 400 undecodable payload,
//! 413 oversized, 502 model unavailable, 500 everything else.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analysis::{Analysis, AnalysisError};
use crate::AppState;

/// POST /api/analyze request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 image payload, no data-URL prefix. The `base64Image` spelling
    /// is accepted for older front-end builds.
    #[serde(default, rename = "imageBase64", alias = "base64Image")]
    pub image_base64: Option<String>,

    /// Optional instruction overriding the default measurement prompt
    #[serde(default)]
    pub prompt: Option<String>,
}

/// POST /api/analyze success body.
///
/// The snake_case Portuguese keys mirror the camelCase ones; older front-end
/// builds read those.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub altura_mm: f64,
    pub largura_mm: f64,
    pub comprimento_mm: f64,
    #[serde(rename = "heightMm")]
    pub height_mm: f64,
    #[serde(rename = "widthMm")]
    pub width_mm: f64,
    #[serde(rename = "lengthMm")]
    pub length_mm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl From<Analysis> for AnalyzeResponse {
    fn from(analysis: Analysis) -> Self {
        let d = analysis.dimensions;
        Self {
            altura_mm: d.height_mm,
            largura_mm: d.width_mm,
            comprimento_mm: d.length_mm,
            height_mm: d.height_mm,
            width_mm: d.width_mm,
            length_mm: d.length_mm,
            explanation: analysis.explanation,
        }
    }
}

/// POST /api/analyze
pub async fn analyze_image(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AnalyzeError> {
    let raw = request
        .image_base64
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if raw.is_empty() {
        return Err(AnalyzeError::MissingImage);
    }

    let image = BASE64
        .decode(raw)
        .map_err(|_| AnalyzeError::UndecodableImage)?;

    let analysis = state
        .analyzer
        .analyze(&image, request.prompt.as_deref())
        .await
        .map_err(AnalyzeError::Analysis)?;

    Ok(Json(AnalyzeResponse::from(analysis)))
}

/// Analyze endpoint errors
#[derive(Debug)]
pub enum AnalyzeError {
    /// No image in the request body
    MissingImage,
    /// Payload present but not valid base64
    UndecodableImage,
    /// Adapter-level failure
    Analysis(AnalysisError),
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AnalyzeError::MissingImage => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Imagem ausente. Envie o base64 da foto.".to_string(),
                None,
            ),
            AnalyzeError::UndecodableImage => (
                StatusCode::BAD_REQUEST,
                "Imagem inválida. Não foi possível decodificar o base64.".to_string(),
                None,
            ),
            AnalyzeError::Analysis(err) => {
                let status = match &err {
                    AnalysisError::InvalidImage => StatusCode::BAD_REQUEST,
                    AnalysisError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                    AnalysisError::ServiceUnavailable { .. } => StatusCode::BAD_GATEWAY,
                    AnalysisError::ServerMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
                    AnalysisError::Unknown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let details = match &err {
                    AnalysisError::ServiceUnavailable { details }
                    | AnalysisError::Unknown { details } => Some(details.clone()),
                    _ => None,
                };
                (status, err.to_string(), details)
            }
        };

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %message, "Image analysis failed");
        }

        let body = match details {
            Some(details) => Json(json!({ "error": message, "details": details })),
            None => Json(json!({ "error": message })),
        };

        (status, body).into_response()
    }
}
