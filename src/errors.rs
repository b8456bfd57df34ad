/*!
 * Error types for the mdsync application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while manipulating block sequences
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlockError {
    /// The identity list does not line up with the blocks of a sequence
    #[error("Identity count mismatch: {actual} identities supplied for {expected} blocks")]
    IdentityCountMismatch {
        /// Number of blocks in the sequence
        expected: usize,
        /// Number of identities supplied
        actual: usize,
    },
}

/// Errors that can occur when working with the translation engine
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when the HTTP client cannot be set up
    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },
}

/// Errors that can occur during the translation of a document
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the translation engine
    #[error("Translation engine error: {0}")]
    Provider(#[from] ProviderError),

    /// Error while realigning block identities
    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    /// Error from the markup converter
    #[error("Markup conversion failed: {0}")]
    Conversion(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the hash inventory
    #[error("Hash inventory error: {0}")]
    Inventory(String),

    /// Error from block handling
    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

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

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Inventory(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Inventory(error.to_string())
    }
}
