//! Bridge error types.
//!
//! Provides the error hierarchy for bridge operations:
//! - `BridgeError`: Top-level error for configuration, lifecycle, and
//!   per-record processing failures
//!
//! Engine failures pass through transparently: a caller sees the
//! [`EngineError`] exactly as the engine raised it, wrapped only for
//! typing.

use thiserror::Error;

use trestle_pipeline::EngineError;

/// Errors that can occur during bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Required configuration key is missing.
    #[error("missing required config: {0}")]
    MissingConfig(String),

    /// Invalid bridge configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The bridge is not in the expected state.
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// The expected state.
        expected: String,
        /// The actual state.
        actual: String,
    },

    /// An error raised by the pipeline engine, propagated unchanged.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
