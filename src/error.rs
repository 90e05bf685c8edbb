use thiserror::Error;

/// Failure kinds surfaced by the script analysis service.
///
/// Display strings are written for direct presentation to the user. No
/// partial analysis result ever accompanies one of these; analysis is
/// all-or-nothing.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API key was configured. No network call was attempted.
    #[error("API key is not configured. Set llm.api_key in config.yml or the GEMINI_API_KEY environment variable.")]
    Configuration,

    /// The service rejected the configured credential.
    #[error("Invalid API key. The AI service rejected the configured credential: {message}")]
    Authentication { message: String },

    /// Any other failure from the invocation step (timeout, 5xx, connectivity).
    #[error("An error occurred while communicating with the AI: {message}")]
    Service { message: String },

    /// The response text was not valid JSON after fence-stripping. Carries a
    /// bounded snippet of the offending text so errors stay loggable.
    #[error("Failed to parse AI response. The response format was invalid ({detail}). Raw snippet: {snippet}")]
    MalformedResponse { detail: String, snippet: String },

    /// The response was valid JSON but did not match the required schema.
    #[error("AI response is not in the expected format: {reason}")]
    UnexpectedShape { reason: String },
}
