//! Error types for wake word configuration

use thiserror::Error;

/// Reasons a configuration update is refused
///
/// A refused update leaves the engine's previous configuration in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Phrase has no words after trimming
    #[error("wake phrase must contain at least one word")]
    EmptyPhrase,

    /// Threshold below zero
    #[error("max distance must be non-negative, got {0}")]
    NegativeThreshold(i64),
}
