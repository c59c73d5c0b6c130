pub mod analyzer;
pub mod gate;
pub mod parser;
pub mod prompt;
pub mod transport;
pub mod types;

pub use analyzer::*;
pub use gate::*;
pub use parser::*;
pub use prompt::*;
pub use transport::*;
pub use types::*;

use thiserror::Error;

/// Why an analysis attempt did not produce a model result. Never returned
/// from [`SymptomAnalyzer::analyze`], which substitutes the fallback result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("API key is missing. Set OPENROUTER_API_KEY to enable analysis.")]
    MissingCredential,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model API returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Completion contained no message content")]
    EmptyContent,

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Model response missing required field: {0}")]
    MissingField(&'static str),
}
