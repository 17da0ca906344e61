//! Error types for notification delivery

use thiserror::Error;

/// Errors raised while validating, rendering or sending a booking email
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The request body was not valid JSON or missed a required field
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A recipient or sender address could not be used
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress {
        /// Offending address
        address: String,
        /// Parser message
        reason: String,
    },

    /// HTTP request to the email API failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The email API answered with something other than JSON
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Provider refused the message (used by transports with a clear refusal signal)
    #[error("Email rejected: {0}")]
    Rejected(String),
}

impl NotificationError {
    /// Metric label for this error
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidAddress { .. } => "invalid_address",
            Self::RequestFailed(_) => "request_failed",
            Self::ResponseParseFailed(_) => "response_parse_failed",
            Self::Smtp(_) => "smtp",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Every notification failure reaches HTTP callers as a `500` carrying the message.
impl From<NotificationError> for sathi_web::AppError {
    fn from(error: NotificationError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, NotificationError>;
