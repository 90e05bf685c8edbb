//! Script2Video Studio
//!
//! A guided wizard that turns a plain-text script into a structured video
//! concept: the script is sent to an LLM for paragraph-by-paragraph
//! analysis and the result is rendered as a storyboard preview.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod storyboard;
pub mod wizard;

// Re-export the analysis surface at the crate root
pub use analysis::{AnalyzedScript, ScriptAnalyzer, ScriptSegment};
pub use error::AnalysisError;
