//! Error taxonomy for the recommendation engine.
//!
//! Only `Configuration` is fatal, and it is raised at construction time.
//! Every other class is recovered inside the pipeline by diverting to the
//! deterministic fallback recommender; none of them cross the public API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or invalid backend credentials / settings. Raised once at
    /// service startup, never per request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network or backend failure from the reasoning service (timeout, auth,
    /// quota, malformed transport response).
    #[error("reasoning backend failure: {0}")]
    Reasoning(String),

    /// No parsable JSON object could be recovered from the model output.
    #[error("extraction failure: {0}")]
    Extraction(String),

    /// Structurally valid JSON without a usable recommendations list.
    #[error("normalization failure: {0}")]
    Normalization(String),
}

impl EngineError {
    /// Pipeline stage label used as log context when a failure is recovered.
    pub fn stage(&self) -> &'static str {
        match self {
            EngineError::Configuration(_) => "configuration",
            EngineError::Reasoning(_) => "reasoning",
            EngineError::Extraction(_) => "extraction",
            EngineError::Normalization(_) => "normalization",
        }
    }
}
