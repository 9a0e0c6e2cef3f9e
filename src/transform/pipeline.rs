//! Transformation pipeline
//!
//! Applies an already-validated command list to a decoded image:
//! decode → fold commands over the working image → encode in the
//! original format. Each command's result replaces the working image
//! before the next command runs, so commands compose. Everything stays
//! in memory; the buffers are owned exclusively by one request.

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use std::io::Cursor;
use std::num::NonZeroU32;

use crate::constants::THUMBNAIL_SIZE;

use super::command::Command;
use super::error::TransformError;
use super::format::ImageFormat;

/// Result of running the pipeline
#[derive(Debug)]
pub struct TransformedImage {
    /// The encoded output data
    pub data: Vec<u8>,
    /// Content-Type header value for the response
    pub content_type: &'static str,
    /// Source dimensions (width, height)
    pub original_size: (u32, u32),
    /// Output dimensions (width, height)
    pub output_size: (u32, u32),
}

/// Run the full pipeline over raw upload bytes.
///
/// `max_source_pixels` bounds the decoded dimensions before any pixel
/// work starts. The output is re-encoded in the declared input format.
pub fn process(
    data: &[u8],
    format: ImageFormat,
    commands: &[Command],
    max_source_pixels: u64,
) -> Result<TransformedImage, TransformError> {
    let mut image = decode_image(data)?;
    let original_size = (image.width(), image.height());

    let pixels = original_size.0 as u64 * original_size.1 as u64;
    if pixels > max_source_pixels {
        return Err(TransformError::image_too_large(
            original_size.0,
            original_size.1,
            max_source_pixels,
        ));
    }

    for command in commands {
        image = apply_command(image, command)?;
    }

    let output_size = (image.width(), image.height());
    let data = encode_image(&image, format)?;

    Ok(TransformedImage {
        data,
        content_type: format.content_type(),
        original_size,
        output_size,
    })
}

/// Decode upload bytes into a working image
fn decode_image(data: &[u8]) -> Result<DynamicImage, TransformError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| TransformError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| TransformError::decode_failed(e.to_string()))
}

/// Apply one command, consuming the working image and producing the next
pub fn apply_command(image: DynamicImage, command: &Command) -> Result<DynamicImage, TransformError> {
    match command {
        // flipHorizontal mirrors across the horizontal axis: top and
        // bottom swap, which the codec library calls a vertical flip.
        Command::FlipHorizontal => Ok(image.flipv()),
        Command::FlipVertical => Ok(image.fliph()),
        Command::Rotate(degrees) => rotate_degrees(image, *degrees),
        // Single-channel luminance; alpha does not survive the conversion
        Command::Grayscale => Ok(DynamicImage::ImageLuma8(image.to_luma8())),
        Command::Resize { width, height } => resize_exact(&image, *width, *height),
        Command::Thumbnail => shrink_to_thumbnail(image),
        Command::RotateLeft => Ok(image.rotate270()),
        Command::RotateRight => Ok(image.rotate90()),
    }
}

/// Rotate clockwise about the center by an arbitrary number of degrees.
///
/// The canvas keeps its dimensions; regions rotated out of frame are
/// cropped and uncovered corners are filled with black. Full turns are
/// a no-op so they stay pixel-exact.
fn rotate_degrees(image: DynamicImage, degrees: i64) -> Result<DynamicImage, TransformError> {
    let normalized = degrees.rem_euclid(360);
    if normalized == 0 {
        return Ok(image);
    }
    let theta = (normalized as f32).to_radians();

    // Grayscale images stay single-channel through the rotation
    match image {
        DynamicImage::ImageLuma8(gray) => {
            let rotated = rotate_about_center(&gray, theta, Interpolation::Nearest, Luma([0u8]));
            Ok(DynamicImage::ImageLuma8(rotated))
        }
        other => {
            let rgba = other.to_rgba8();
            let rotated =
                rotate_about_center(&rgba, theta, Interpolation::Nearest, Rgba([0u8, 0, 0, 0]));
            Ok(DynamicImage::ImageRgba8(rotated))
        }
    }
}

/// Resize to exact target dimensions with a Lanczos3 filter
fn resize_exact(
    image: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, TransformError> {
    match image {
        DynamicImage::ImageLuma8(gray) => {
            let buf = resize_buffer(
                gray.as_raw().clone(),
                image.width(),
                image.height(),
                target_w,
                target_h,
                PixelType::U8,
            )?;
            let gray_image = GrayImage::from_raw(target_w, target_h, buf)
                .ok_or_else(|| TransformError::resize_failed("Failed to create output image buffer"))?;
            Ok(DynamicImage::ImageLuma8(gray_image))
        }
        other => {
            let buf = resize_buffer(
                other.to_rgba8().into_raw(),
                image.width(),
                image.height(),
                target_w,
                target_h,
                PixelType::U8x4,
            )?;
            let rgba_image = RgbaImage::from_raw(target_w, target_h, buf)
                .ok_or_else(|| TransformError::resize_failed("Failed to create output image buffer"))?;
            Ok(DynamicImage::ImageRgba8(rgba_image))
        }
    }
}

/// Run fast_image_resize over a raw pixel buffer
fn resize_buffer(
    pixels: Vec<u8>,
    src_w: u32,
    src_h: u32,
    target_w: u32,
    target_h: u32,
    pixel_type: PixelType,
) -> Result<Vec<u8>, TransformError> {
    let src_width =
        NonZeroU32::new(src_w).ok_or_else(|| TransformError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(src_h)
        .ok_or_else(|| TransformError::resize_failed("Source height is 0"))?;
    let dst_width = NonZeroU32::new(target_w)
        .ok_or_else(|| TransformError::resize_failed("Target width is 0"))?;
    let dst_height = NonZeroU32::new(target_h)
        .ok_or_else(|| TransformError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(src_width, src_height, pixels, pixel_type)
        .map_err(|e| TransformError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, pixel_type);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| TransformError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    Ok(dst_image.into_vec())
}

/// Shrink to fit the fixed thumbnail bounding box, preserving aspect
/// ratio. Images already inside the box pass through unchanged.
fn shrink_to_thumbnail(image: DynamicImage) -> Result<DynamicImage, TransformError> {
    let (bound_w, bound_h) = THUMBNAIL_SIZE;
    let (src_w, src_h) = (image.width(), image.height());

    if src_w <= bound_w && src_h <= bound_h {
        return Ok(image);
    }

    let scale = f64::min(
        bound_w as f64 / src_w as f64,
        bound_h as f64 / src_h as f64,
    );
    let target_w = ((src_w as f64 * scale).round() as u32).max(1);
    let target_h = ((src_h as f64 * scale).round() as u32).max(1);

    resize_exact(&image, target_w, target_h)
}

/// Encode the working image in the output format
fn encode_image(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, TransformError> {
    let mut buffer = Cursor::new(Vec::new());
    let result = match format {
        ImageFormat::Png => image.write_to(&mut buffer, image::ImageFormat::Png),
        ImageFormat::Jpeg => match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => {
                image.write_to(&mut buffer, image::ImageFormat::Jpeg)
            }
            // JPEG has no alpha channel
            other => DynamicImage::ImageRgb8(other.to_rgb8())
                .write_to(&mut buffer, image::ImageFormat::Jpeg),
        },
        // The GIF encoder expects RGBA frames
        ImageFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8())
            .write_to(&mut buffer, image::ImageFormat::Gif),
    };
    result.map_err(|e| TransformError::encode_failed(format.as_str(), e.to_string()))?;

    Ok(buffer.into_inner())
}
