//! Transformation command parsing and validation
//!
//! A request carries an ordered list of (command name, argument string)
//! form fields. Parsing turns the list into typed [`Command`] values and
//! enforces the per-command argument rules; the first violation wins and
//! nothing is transformed. Commands apply in submission order, each one
//! replacing the working image used by the next.

use std::collections::HashSet;
use std::num::NonZeroU32;

use super::error::TransformError;

/// A single image transformation with its argument payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Mirror across the horizontal axis (top and bottom swap)
    FlipHorizontal,
    /// Mirror across the vertical axis (left and right swap)
    FlipVertical,
    /// Rotate about the center by the given degrees, clockwise-positive
    Rotate(i64),
    /// Convert to single-channel luminance
    Grayscale,
    /// Resize to exact pixel dimensions, no aspect-ratio preservation
    Resize { width: u32, height: u32 },
    /// Shrink to fit the fixed thumbnail bounding box, aspect preserved
    Thumbnail,
    /// Rotate 90 degrees counter-clockwise
    RotateLeft,
    /// Rotate 90 degrees clockwise
    RotateRight,
}

impl Command {
    /// The command name as submitted by clients
    pub fn name(&self) -> &'static str {
        match self {
            Command::FlipHorizontal => "flipHorizontal",
            Command::FlipVertical => "flipVertical",
            Command::Rotate(_) => "rotate",
            Command::Grayscale => "grayscale",
            Command::Resize { .. } => "resize",
            Command::Thumbnail => "thumbnail",
            Command::RotateLeft => "rotateLeft",
            Command::RotateRight => "rotateRight",
        }
    }

    /// Metric label for this command
    pub fn label(&self) -> &'static str {
        match self {
            Command::FlipHorizontal => "flip_horizontal",
            Command::FlipVertical => "flip_vertical",
            Command::Rotate(_) => "rotate",
            Command::Grayscale => "grayscale",
            Command::Resize { .. } => "resize",
            Command::Thumbnail => "thumbnail",
            Command::RotateLeft => "rotate_left",
            Command::RotateRight => "rotate_right",
        }
    }

    /// Parse a single (name, argument) form field into a typed command
    fn from_field(name: &str, args: &str) -> Result<Self, TransformError> {
        match name {
            "flipHorizontal" => Self::no_args(Command::FlipHorizontal, name, args),
            "flipVertical" => Self::no_args(Command::FlipVertical, name, args),
            "grayscale" => Self::no_args(Command::Grayscale, name, args),
            "thumbnail" => Self::no_args(Command::Thumbnail, name, args),
            "rotateLeft" => Self::no_args(Command::RotateLeft, name, args),
            "rotateRight" => Self::no_args(Command::RotateRight, name, args),
            "rotate" => {
                let degrees: i64 = args.trim().parse().map_err(|_| {
                    TransformError::invalid_command(name, "invalid value, must be an integer")
                })?;
                Ok(Command::Rotate(degrees))
            }
            "resize" => {
                let (width, height) = parse_resize_args(args).ok_or_else(|| {
                    TransformError::invalid_command(
                        name,
                        "invalid value, must be a pair of integers separated by a comma or space",
                    )
                })?;
                let parse_dimension = |token: &str| {
                    token.parse::<NonZeroU32>().map_err(|_| {
                        TransformError::invalid_command(
                            name,
                            "invalid value, must be a pair of integers (width, height)",
                        )
                    })
                };
                Ok(Command::Resize {
                    width: parse_dimension(width)?.get(),
                    height: parse_dimension(height)?.get(),
                })
            }
            _ => Err(TransformError::unknown_command(name)),
        }
    }

    fn no_args(command: Command, name: &str, args: &str) -> Result<Command, TransformError> {
        if args.is_empty() {
            Ok(command)
        } else {
            Err(TransformError::invalid_command(
                name,
                "does not accept parameters",
            ))
        }
    }
}

/// Split a resize argument string into its (width, height) tokens.
///
/// If the string contains a comma the split happens on the comma,
/// otherwise on whitespace with empty tokens discarded. Returns None
/// unless exactly two tokens remain; both are returned trimmed, width
/// first. Numeric conversion happens at the call site.
pub fn parse_resize_args(args: &str) -> Option<(&str, &str)> {
    let tokens: Vec<&str> = if args.contains(',') {
        args.split(',').collect()
    } else {
        args.split_whitespace().collect()
    };

    match tokens[..] {
        [width, height] => Some((width.trim(), height.trim())),
        _ => None,
    }
}

/// Parse and validate an ordered command list from request form fields.
///
/// Duplicate field names keep the first occurrence, mirroring the mapping
/// semantics of the request form. The first invalid entry aborts the whole
/// list; a valid result preserves submission order.
pub fn parse_command_list<S>(fields: &[(S, S)]) -> Result<Vec<Command>, TransformError>
where
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut commands = Vec::with_capacity(fields.len());

    for (name, args) in fields {
        let name = name.as_ref();
        if !seen.insert(name) {
            continue;
        }
        commands.push(Command::from_field(name, args.as_ref())?);
    }

    Ok(commands)
}
