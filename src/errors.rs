/*!
 * Error types for the resfill application.
 *
 * Each failure scope gets its own enum so callers can decide how far an
 * error travels: provider errors stay with one entry, parse/write/validation
 * errors stay with one file.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with translation provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
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

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered but the answer carried no text
    #[error("Provider returned an empty translation")]
    EmptyResponse,
}

/// Errors raised while reading a resource dictionary
#[derive(Error, Debug)]
pub enum ParseError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed XML
    #[error("Malformed XML in {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// The document root is not `<resources>`
    #[error("Unexpected root element <{found}> in {path}, expected <resources>")]
    UnexpectedRoot { path: PathBuf, found: String },

    /// The same key appears twice in one dictionary
    #[error("Duplicate key '{key}' in {path}")]
    DuplicateKey { path: PathBuf, key: String },
}

/// Errors raised while rendering or writing a resource dictionary
#[derive(Error, Debug)]
pub enum WriteError {
    /// The dictionary's document could not be streamed back out
    #[error("Failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },

    /// The file could not be written
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reported by the well-formedness validator
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("XML validation failed for {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("No root element in {path}")]
    MissingRoot { path: PathBuf },

    #[error("More than one root element in {path}")]
    MultipleRoots { path: PathBuf },
}
