//! Error types for the store client, the dispatcher seam and auth

use thiserror::Error;

/// Errors talking to the hosted data store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body did not match the expected rows
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The store answered with an error status (row-level policy refusals included)
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body from the store
        message: String,
    },
}

/// Errors delivering a confirmation request to the notification dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The booking lacks data the email needs
    #[error("Cannot build confirmation request: {0}")]
    InvalidRequest(String),

    /// HTTP request to the dispatcher failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The dispatcher answered with a non-2xx status
    #[error("Dispatcher rejected request (status {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error body
        message: String,
    },

    /// The dispatcher's success body could not be read
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// In-process notification service failed
    #[error("Notification failed: {0}")]
    Notification(String),
}

/// Errors from the hosted auth service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Wrong email or password
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Access token missing, expired or revoked
    #[error("Not signed in or session expired")]
    Unauthorized,

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body did not match the expected shape
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Any other error status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body
        message: String,
    },
}
