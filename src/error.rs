//! Error handling types for livemark
//!
//! This module provides the crate-wide error type and the lock recovery helper
//! shared by the caches and trackers.

use std::sync::PoisonError;
use thiserror::Error;

use crate::diagram::RenderError;
use crate::drop::UploadError;

/// Comprehensive error type for overlay operations
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Diagram rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Upload of a dropped or pasted file failed
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for overlay operations
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Helper trait to convert PoisonError to OverlayError
pub trait LockResultExt<T> {
    /// Convert a PoisonError into a recovered guard, logging the recovery.
    ///
    /// The context parameter identifies which operation triggered lock recovery.
    fn recover_poison(self, context: &str) -> Result<T, OverlayError>;
}

impl<T> LockResultExt<T> for Result<T, PoisonError<T>> {
    fn recover_poison(self, context: &str) -> Result<T, OverlayError> {
        match self {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                log::warn!(
                    target: "livemark::lock_recovery",
                    "Recovered from poisoned lock in {}",
                    context
                );
                Ok(poisoned.into_inner())
            }
        }
    }
}

impl OverlayError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        OverlayError::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        OverlayError::Internal(message.into())
    }
}
