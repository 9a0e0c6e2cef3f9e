// Error types module

use std::fmt;

use crate::transform::TransformError;

/// Centralized error type for the service
///
/// Categorizes request failures for consistent HTTP status mapping and
/// a uniform JSON error payload.
#[derive(Debug, Clone)]
pub enum ServiceError {
    /// Request carried no image file part
    MissingImage,

    /// Request carried no transformation command fields
    MissingCommands,

    /// Command validation or pixel processing failed
    Transform(TransformError),

    /// Configuration errors (invalid YAML, bad values, etc.)
    Config(String),

    /// Internal errors (malformed multipart stream, unexpected failures)
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::MissingImage => write!(f, "no image file provided"),
            ServiceError::MissingCommands => write!(f, "no transformation command provided"),
            ServiceError::Transform(err) => write!(f, "{}", err),
            ServiceError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<TransformError> for ServiceError {
    fn from(err: TransformError) -> Self {
        ServiceError::Transform(err)
    }
}

impl ServiceError {
    /// Maps service errors to HTTP status codes
    pub fn to_http_status(&self) -> u16 {
        match self {
            ServiceError::MissingImage | ServiceError::MissingCommands => 400,
            ServiceError::Transform(err) => err.to_http_status(),
            ServiceError::Config(_) | ServiceError::Internal(_) => 500,
        }
    }
}
