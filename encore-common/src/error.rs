//! Common error types for Encore

use thiserror::Error;

/// Common result type for Encore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Encore service
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown session identifier
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Unknown request id within a session
    #[error("Request not found: {0}")]
    RequestNotFound(u64),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Mutation attempted on a session already marked ENDED
    #[error("Session has ended: {0}")]
    SessionEnded(String),

    /// Advance called with nothing left to promote
    #[error("No pending requests in queue")]
    NoPendingRequests,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
