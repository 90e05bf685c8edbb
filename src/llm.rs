use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Generation settings sent with every analysis request. Analysis should be
/// consistent across repeated calls on the same script, so the temperature
/// stays low and JSON output is requested from the service directly.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub json_output: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            json_output: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no content (finish reason: {0})")]
    EmptyResponse(String),

    #[error("unexpected response envelope: {0}")]
    Envelope(String),
}

/// Transport seam for the LLM service. A single awaited request-response
/// exchange: no streaming, no retries.
#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    /// Submit a prompt and return the raw text payload of the first candidate.
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, LlmError>;
}

#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiError {
    message: String,
    status: Option<String>,
}

#[derive(Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiError,
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, LlmError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            model, api_key
        );

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: options
                    .json_output
                    .then(|| "application/json".to_string()),
                temperature: options.temperature,
            },
        };

        debug!("sending generateContent request to model {}", model);
        let resp = self.client.post(&url).json(&request_body).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let result: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::Envelope(format!("{}. Body: {}", e, body)))?;

        extract_candidate_text(result)
    }
}

fn extract_candidate_text(result: GeminiResponse) -> Result<String, LlmError> {
    if let Some(err) = result.error {
        return Err(classify_error_message(200, &err.message, err.status.as_deref()));
    }

    let candidates = result.candidates.unwrap_or_default();
    let Some(first) = candidates.first() else {
        return Err(LlmError::Envelope(
            "response carried no candidates".to_string(),
        ));
    };

    if let Some(content) = &first.content {
        if let Some(part) = content.parts.first() {
            return Ok(part.text.clone());
        }
    }

    // Content or parts are missing, typically a safety block
    let reason = first.finish_reason.as_deref().unwrap_or("UNKNOWN");
    Err(LlmError::EmptyResponse(reason.to_string()))
}

fn classify_api_error(status: u16, body: &str) -> LlmError {
    match serde_json::from_str::<GeminiErrorEnvelope>(body) {
        Ok(envelope) => classify_error_message(
            status,
            &envelope.error.message,
            envelope.error.status.as_deref(),
        ),
        Err(_) => LlmError::Api {
            status,
            message: body.to_string(),
        },
    }
}

fn classify_error_message(status: u16, message: &str, api_status: Option<&str>) -> LlmError {
    let invalid_key = message.to_ascii_lowercase().contains("api key not valid")
        || matches!(api_status, Some("UNAUTHENTICATED") | Some("PERMISSION_DENIED"));

    if invalid_key {
        LlmError::InvalidApiKey(message.to_string())
    } else {
        LlmError::Api {
            status,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_success() {
        let json = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [
                            { "text": "{\"segments\":[]}" }
                        ],
                        "role": "model"
                    },
                    "finishReason": "STOP",
                    "index": 0
                }
            ]
        }"#;

        let result: GeminiResponse = serde_json::from_str(json).unwrap();
        let text = extract_candidate_text(result).unwrap();
        assert_eq!(text, "{\"segments\":[]}");
    }

    #[test]
    fn test_response_parsing_safety_block() {
        // Content is blocked: candidate present but content missing
        let json = r#"{
            "candidates": [
                {
                    "finishReason": "SAFETY",
                    "index": 0
                }
            ]
        }"#;

        let result: GeminiResponse = serde_json::from_str(json).unwrap();
        match extract_candidate_text(result) {
            Err(LlmError::EmptyResponse(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected EmptyResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_response_parsing_empty_parts() {
        let json = r#"{
            "candidates": [
                {
                    "content": { "role": "model" },
                    "finishReason": "STOP",
                    "index": 0
                }
            ]
        }"#;

        let result: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_candidate_text(result),
            Err(LlmError::EmptyResponse(_))
        ));
    }

    #[test]
    fn test_response_parsing_no_candidates() {
        let result: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_candidate_text(result),
            Err(LlmError::Envelope(_))
        ));
    }

    #[test]
    fn test_classify_invalid_key_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            classify_api_error(400, body),
            LlmError::InvalidApiKey(_)
        ));
    }

    #[test]
    fn test_classify_invalid_key_status() {
        let body = r#"{"error":{"code":403,"message":"The caller does not have permission","status":"PERMISSION_DENIED"}}"#;
        assert!(matches!(
            classify_api_error(403, body),
            LlmError::InvalidApiKey(_)
        ));
    }

    #[test]
    fn test_classify_other_error() {
        let body = r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#;
        match classify_api_error(503, body) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "The model is overloaded.");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_unparseable_body() {
        match classify_api_error(502, "<html>Bad Gateway</html>") {
            LlmError::Api { status, message } => {
                assert_eq!(status, 502);
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_request_carries_generation_config() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                temperature: 0.2,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        let temperature = value["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
    }
}
