//! Gemini image-measurement client
//!
//! Sends the sample photo inline to the Generative Language REST API and
//! reshapes the model's JSON answer into [`Dimensions`]. The model is an
//! opaque oracle here: anything it returns that is not three finite numbers
//! is reported as the service being unavailable, and the user re-attempts
//! the capture manually.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Analysis, AnalysisError, Dimensions};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Instruction sent when the caller supplies no prompt of its own
const DEFAULT_PROMPT: &str = "Você é um assistente que mede dimensões básicas de uma amostra a \
partir de uma foto. Responda SOMENTE em JSON válido com as chaves: heightMm, widthMm, lengthMm. \
Use números em milímetros (mm). Se não tiver certeza absoluta, retorne null para o campo. \
Exemplo de resposta: {\"heightMm\": 10.2, \"widthMm\": 25.1, \"lengthMm\": 31.0}";

/// Remote analyzer backed by the Gemini generateContent endpoint
pub struct GeminiAnalyzer {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// generateContent response, reduced to the part we consume.
///
/// Every field is optional; presence is validated explicitly rather than
/// trusted.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiAnalyzer {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL. Test hook.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Estimate sample dimensions from a photo.
    pub async fn analyze(
        &self,
        image: &[u8],
        prompt: Option<&str>,
    ) -> Result<Analysis, AnalysisError> {
        if self.api_key.trim().is_empty() {
            return Err(AnalysisError::ServerMisconfigured);
        }

        let prompt = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROMPT);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        );
        let body = json!({
            "generationConfig": { "responseMimeType": "application/json" },
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": prompt },
                    { "inlineData": { "mimeType": "image/jpeg", "data": BASE64.encode(image) } },
                ],
            }],
        });

        tracing::debug!(model = GEMINI_MODEL, image_bytes = image.len(), "Requesting image analysis");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::ServiceUnavailable {
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Gemini API error");
            // Model-level failures surface as the service being unavailable;
            // anything else is an internal fault worth investigating.
            if status.as_u16() == 404 || detail.to_lowercase().contains("model") {
                return Err(AnalysisError::ServiceUnavailable { details: detail });
            }
            return Err(AnalysisError::Unknown {
                details: format!("API error {}: {}", status.as_u16(), detail),
            });
        }

        let parsed: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| AnalysisError::ServiceUnavailable {
                    details: e.to_string(),
                })?;

        let text = first_candidate_text(&parsed).ok_or_else(|| {
            AnalysisError::ServiceUnavailable {
                details: "empty candidate text".to_string(),
            }
        })?;

        let dimensions = parse_dimensions(&text)?;

        tracing::info!(
            height_mm = dimensions.height_mm,
            width_mm = dimensions.width_mm,
            length_mm = dimensions.length_mm,
            "Image analysis completed"
        );

        Ok(Analysis {
            dimensions,
            explanation: Some("Medidas estimadas a partir da imagem enviada.".to_string()),
        })
    }
}

/// Concatenated text of the first candidate's parts
fn first_candidate_text(response: &GenerateContentResponse) -> Option<String> {
    let parts = response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .as_ref()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("");
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extract `{heightMm, widthMm, lengthMm}` from the model's answer text.
///
/// The model is asked for bare JSON but sometimes wraps it in prose or code
/// fences, so the outermost brace pair is sliced out before parsing.
fn parse_dimensions(text: &str) -> Result<Dimensions, AnalysisError> {
    let candidate = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end >= start => &text[start..=end],
        _ => text,
    };

    let parsed: Value =
        serde_json::from_str(candidate).map_err(|_| AnalysisError::ServiceUnavailable {
            details: "Não foi possível interpretar a resposta da IA. Tente outra imagem."
                .to_string(),
        })?;

    let height_mm = numeric_field(&parsed, "heightMm");
    let width_mm = numeric_field(&parsed, "widthMm");
    let length_mm = numeric_field(&parsed, "lengthMm");

    match (height_mm, width_mm, length_mm) {
        (Some(height_mm), Some(width_mm), Some(length_mm)) => Ok(Dimensions {
            height_mm,
            width_mm,
            length_mm,
        }),
        _ => Err(AnalysisError::ServiceUnavailable {
            details: "Resposta incompleta da IA. Tente outra imagem.".to_string(),
        }),
    }
}

/// Read a finite number from a field that may arrive as a number or a
/// numeric string.
fn numeric_field(value: &Value, key: &str) -> Option<f64> {
    let field = value.get(key)?;
    let number = match field {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_json_answer() {
        let dims =
            parse_dimensions(r#"{"heightMm": 10.2, "widthMm": 25.1, "lengthMm": 31.0}"#).unwrap();
        assert_eq!(dims.height_mm, 10.2);
        assert_eq!(dims.width_mm, 25.1);
        assert_eq!(dims.length_mm, 31.0);
    }

    #[test]
    fn test_parse_answer_wrapped_in_prose() {
        let text = "Claro! Aqui estão as medidas:\n```json\n{\"heightMm\": 9.5, \"widthMm\": 22.0, \"lengthMm\": 28.3}\n```";
        let dims = parse_dimensions(text).unwrap();
        assert_eq!(dims.height_mm, 9.5);
    }

    #[test]
    fn test_parse_numeric_strings() {
        let dims =
            parse_dimensions(r#"{"heightMm": "10.5", "widthMm": "25", "lengthMm": "30"}"#).unwrap();
        assert_eq!(dims.height_mm, 10.5);
        assert_eq!(dims.width_mm, 25.0);
    }

    #[test]
    fn test_null_field_is_incomplete() {
        let result =
            parse_dimensions(r#"{"heightMm": null, "widthMm": 25.0, "lengthMm": 30.0}"#);
        assert!(matches!(
            result,
            Err(AnalysisError::ServiceUnavailable { .. })
        ));
    }

    #[test]
    fn test_non_json_answer_is_unavailable() {
        let result = parse_dimensions("desculpe, não consegui medir a amostra");
        assert!(matches!(
            result,
            Err(AnalysisError::ServiceUnavailable { .. })
        ));
    }

    #[test]
    fn test_candidate_text_concatenates_parts() {
        let response = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![
                        CandidatePart {
                            text: Some("{\"heightMm\": 10,".to_string()),
                        },
                        CandidatePart {
                            text: Some(" \"widthMm\": 25, \"lengthMm\": 30}".to_string()),
                        },
                    ]),
                }),
            }]),
        };
        let text = first_candidate_text(&response).unwrap();
        let dims = parse_dimensions(&text).unwrap();
        assert_eq!(dims.width_mm, 25.0);
    }

    #[test]
    fn test_missing_candidates_yield_none() {
        let response = GenerateContentResponse { candidates: None };
        assert!(first_candidate_text(&response).is_none());
    }
}
