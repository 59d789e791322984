//! Error types for the Snack Wagon binary.
//!
//! [`EngineError`] is the top-level error type that wraps all failure
//! modes during startup and the run loop, so `main` can propagate
//! everything with `?`.

/// Top-level error for the Snack Wagon binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: snackwagon_core::ConfigError,
    },

    /// The service day driver task panicked or was cancelled.
    #[error("driver error: {message}")]
    Driver {
        /// Description of the driver failure.
        message: String,
    },
}
