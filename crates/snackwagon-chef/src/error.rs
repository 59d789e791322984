//! Error types for the chef crate.
//!
//! These errors never cross the crate boundary: every public generation
//! call resolves to a fallback value instead of failing. They exist so
//! the backend and parsing layers can report precisely what went wrong
//! before the fallback is substituted.

/// Errors that can occur while generating a dish or event.
#[derive(Debug, thiserror::Error)]
pub enum ChefError {
    /// The text-generation backend returned an error or was unreachable.
    #[error("generation backend error: {0}")]
    Backend(String),

    /// The response text could not be parsed into a valid value.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
