//! Image format gate
//!
//! Uploaded images are admitted based on the declared media type of the
//! file part. The allowed set is fixed; the output is always re-encoded
//! in the input's format.

use std::str::FromStr;

use super::error::TransformError;

/// Allowed formats, as listed in user-visible error messages
pub const ALLOWED_FORMATS: &str = "png, jpeg, jpg, gif";

/// Image formats accepted by the transform endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }

    /// Derive the format from a declared media type (e.g. "image/png").
    ///
    /// The format tag is the substring after the first '/'; a media type
    /// without a subtype is rejected as unsupported.
    pub fn from_media_type(media_type: &str) -> Result<Self, TransformError> {
        let subtype = media_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .ok_or_else(|| TransformError::unsupported_format(media_type))?;
        subtype.parse()
    }

    /// The corresponding format tag of the codec library
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Gif => image::ImageFormat::Gif,
        }
    }
}

impl FromStr for ImageFormat {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "gif" => Ok(ImageFormat::Gif),
            _ => Err(TransformError::unsupported_format(s)),
        }
    }
}
