//! Image transformation module
//!
//! The algorithmic core of the service:
//! - Typed command vocabulary with per-command argument validation
//! - Ordered pipeline application (each command replaces the working image)
//! - Format gate for the fixed set of accepted upload formats
//!
//! Commands are validated in full before any pixel work starts, so an
//! invalid list never leaves partial effects behind.

pub mod command;
pub mod error;
pub mod format;
pub mod pipeline;

// Re-export commonly used types
pub use command::{parse_command_list, parse_resize_args, Command};
pub use error::TransformError;
pub use format::{ImageFormat, ALLOWED_FORMATS};
pub use pipeline::{apply_command, process, TransformedImage};
