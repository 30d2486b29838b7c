//! Error types for track operations.

use thiserror::Error;

/// Errors produced by track components.
///
/// Exhausted resources and missing buckets are not errors: `take` degrades to
/// an empty slice and a repository miss is resolved through the factory.
#[derive(Debug, Error)]
pub enum TrackError {
    /// Operation attempted against a resource or event in the wrong state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Repository-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
    /// Configuration rejected during validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
