/*!
 * Error types for the yabtwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making a translation request fails
    #[error("Translation request failed: {0}")]
    RequestFailed(String),

    /// Error with authentication against the provider
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Error related to rate limiting or quota exhaustion
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider returned an empty translation
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// Errors that can occur while persisting or loading session state
#[derive(Error, Debug)]
pub enum SessionError {
    /// Error reading or writing the session slot
    #[error("Session storage error: {0}")]
    Storage(String),

    /// The persisted record does not have the expected shape
    #[error("Corrupt session record: {0}")]
    CorruptRecord(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a translation provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from session persistence
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
