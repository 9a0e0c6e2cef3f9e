//! Transformation error types
//!
//! Provides structured error handling with HTTP status mapping for
//! everything that can go wrong between receiving a command list and
//! producing the encoded result.

use std::fmt;

use super::format::ALLOWED_FORMATS;

/// Errors that can occur while validating commands or transforming an image
#[derive(Debug, Clone)]
pub enum TransformError {
    // === Input Errors ===
    /// Declared media type is not in the allowed set
    UnsupportedFormat { format: String },
    /// Command name is not part of the fixed command vocabulary
    UnknownCommand { command: String },
    /// Command argument has the wrong shape (missing, extra, or malformed)
    InvalidCommand { command: String, message: String },
    /// Decoded dimensions exceed the configured pixel budget
    ImageTooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    // === Backend Errors ===
    /// Failed to decode the uploaded image data
    DecodeFailed { message: String },
    /// Resize or thumbnail operation failed
    ResizeFailed { message: String },
    /// Encoding the result back to the original format failed
    EncodeFailed { format: String, message: String },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::UnsupportedFormat { format } => {
                write!(
                    f,
                    "Unsupported image format '{}', must be one of: {}",
                    format, ALLOWED_FORMATS
                )
            }
            TransformError::UnknownCommand { command } => {
                write!(f, "{}: unknown command", command)
            }
            TransformError::InvalidCommand { command, message } => {
                write!(f, "{}: {}", command, message)
            }
            TransformError::ImageTooLarge {
                width,
                height,
                max_pixels,
            } => {
                write!(
                    f,
                    "Image dimensions {}x{} exceed limit of {} pixels",
                    width, height, max_pixels
                )
            }
            TransformError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            TransformError::ResizeFailed { message } => {
                write!(f, "Resize failed: {}", message)
            }
            TransformError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
        }
    }
}

impl std::error::Error for TransformError {}

impl TransformError {
    /// Maps transformation errors to HTTP status codes
    ///
    /// Status mapping:
    /// - UnsupportedFormat, UnknownCommand, InvalidCommand → 400 (Bad Request)
    /// - ImageTooLarge → 413 (Payload Too Large)
    /// - DecodeFailed, ResizeFailed, EncodeFailed → 500
    ///   (backend failures; the client input already passed validation)
    pub fn to_http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            TransformError::UnsupportedFormat { .. }
            | TransformError::UnknownCommand { .. }
            | TransformError::InvalidCommand { .. } => 400,

            // 413 Payload Too Large
            TransformError::ImageTooLarge { .. } => 413,

            // 500 Internal Server Error
            TransformError::DecodeFailed { .. }
            | TransformError::ResizeFailed { .. }
            | TransformError::EncodeFailed { .. } => 500,
        }
    }

    /// Helper constructors for common error patterns
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        TransformError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn unknown_command(command: impl Into<String>) -> Self {
        TransformError::UnknownCommand {
            command: command.into(),
        }
    }

    pub fn invalid_command(command: impl Into<String>, message: impl Into<String>) -> Self {
        TransformError::InvalidCommand {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        TransformError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        TransformError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        TransformError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn image_too_large(width: u32, height: u32, max_pixels: u64) -> Self {
        TransformError::ImageTooLarge {
            width,
            height,
            max_pixels,
        }
    }
}
