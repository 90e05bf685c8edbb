//! Script analysis: prompt construction, defensive decoding of the model
//! response, and structural validation of the analyzed script.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AnalysisError;
use crate::llm::{GenerationOptions, GeminiClient, LlmClient, LlmError};

/// One analyzed paragraph of the script. Field names mirror the wire
/// contract with the model. Non-emptiness of the text fields is part of the
/// prompt contract and is not re-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSegment {
    pub paragraph_text: String,
    pub topic: String,
    pub keywords: Vec<String>,
    pub tone: String,
}

/// The complete analysis result for one script submission. Segment order
/// follows paragraph order in the source script; that ordering is part of
/// the contract with the model and is not re-verified here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedScript {
    pub segments: Vec<ScriptSegment>,
}

const SNIPPET_LIMIT: usize = 200;

/// Build the instruction text sent to the model. Pure function of the
/// script; this is the single point of control over the expected response
/// shape, so any change here must be mirrored in the validation below.
pub fn build_analysis_prompt(script: &str) -> String {
    format!(
        r#"You are an AI script analyzer for a video creation platform. Analyze the following video script.
For each paragraph, provide:
1. The original paragraph text.
2. A concise topic (2-5 words).
3. An array of 3-5 relevant keywords for B-roll visuals.
4. The dominant emotional tone (e.g., Neutral, Joyful, Serious, Energetic, Calm, Professional, Inspirational, Humorous).

Return your analysis as a JSON object with a single key "segments", which is an array of objects. Each object in the "segments" array should have the following structure:
{{
  "paragraphText": "The original text of the paragraph...",
  "topic": "Concise topic...",
  "keywords": ["keyword1", "keyword2", "keyword3"],
  "tone": "Detected tone"
}}

Ensure the entire output is a valid JSON object starting with {{ and ending with }}. Do not include any explanatory text, comments, or markdown formatting like ```json ... ``` around the JSON object.

Script:
---
{script}
---
"#
    )
}

/// Strip a markdown code fence wrapped around the whole payload. Some models
/// fence their JSON output despite instructions not to. The opening fence
/// may carry a language tag; the closing fence may sit on the content line.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the language tag line if the opening fence carries one
    let inner = match rest.find('\n') {
        Some(newline) if rest[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[newline + 1..]
        }
        _ => rest,
    };
    inner.trim()
}

fn snippet(text: &str) -> String {
    let mut out: String = text.chars().take(SNIPPET_LIMIT).collect();
    if text.chars().count() > SNIPPET_LIMIT {
        out.push_str("...");
    }
    out
}

/// Decode and validate raw model output into an [`AnalyzedScript`].
///
/// Pipeline: trim, fence-stripping, JSON decoding into a dynamic value,
/// shape validation, then conversion. Validation is all-or-nothing; a single
/// bad segment rejects the whole payload.
pub fn decode_analysis(raw: &str) -> Result<AnalyzedScript, AnalysisError> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        warn!("model returned non-JSON payload: {}", e);
        AnalysisError::MalformedResponse {
            detail: e.to_string(),
            snippet: snippet(cleaned),
        }
    })?;

    validate_shape(&value).map_err(|reason| {
        warn!("model returned JSON with unexpected shape: {}", reason);
        AnalysisError::UnexpectedShape { reason }
    })?;

    serde_json::from_value(value).map_err(|e| AnalysisError::UnexpectedShape {
        reason: e.to_string(),
    })
}

fn validate_shape(value: &Value) -> Result<(), String> {
    let Some(object) = value.as_object() else {
        return Err("top-level value is not an object".to_string());
    };
    let Some(segments) = object.get("segments") else {
        return Err("missing \"segments\" key".to_string());
    };
    let Some(segments) = segments.as_array() else {
        return Err("\"segments\" is not an array".to_string());
    };

    for (index, segment) in segments.iter().enumerate() {
        validate_segment(segment).map_err(|reason| format!("segment {}: {}", index, reason))?;
    }
    Ok(())
}

fn validate_segment(segment: &Value) -> Result<(), String> {
    for field in ["paragraphText", "topic", "tone"] {
        if !segment.get(field).map_or(false, Value::is_string) {
            return Err(format!("\"{}\" is missing or not a string", field));
        }
    }
    let Some(keywords) = segment.get("keywords").and_then(Value::as_array) else {
        return Err("\"keywords\" is missing or not an array".to_string());
    };
    if !keywords.iter().all(Value::is_string) {
        return Err("\"keywords\" contains a non-string element".to_string());
    }
    Ok(())
}

/// The script analysis service. Holds the resolved credential and the
/// transport; each call is independent and stateless.
pub struct ScriptAnalyzer {
    credential: Option<String>,
    llm: Box<dyn LlmClient>,
}

impl ScriptAnalyzer {
    pub fn new(credential: Option<String>) -> Self {
        Self::with_client(credential, Box::new(GeminiClient::new()))
    }

    /// Construct with an explicit transport. Tests use this to substitute a
    /// mock client.
    pub fn with_client(credential: Option<String>, llm: Box<dyn LlmClient>) -> Self {
        Self { credential, llm }
    }

    /// Analyze a script with the given model: the sole entry point of the
    /// service. Returns a validated [`AnalyzedScript`] or one specific
    /// [`AnalysisError`] kind. The credential is checked before any network
    /// activity.
    pub async fn analyze(
        &self,
        script: &str,
        model: &str,
    ) -> Result<AnalyzedScript, AnalysisError> {
        let api_key = match self.credential.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(AnalysisError::Configuration),
        };

        let prompt = build_analysis_prompt(script);
        debug!("requesting script analysis from model {}", model);

        let raw = self
            .llm
            .generate(api_key, model, &prompt, GenerationOptions::default())
            .await
            .map_err(|e| match e {
                LlmError::InvalidApiKey(message) => AnalysisError::Authentication { message },
                other => AnalysisError::Service {
                    message: other.to_string(),
                },
            })?;

        decode_analysis(&raw)
    }
}
