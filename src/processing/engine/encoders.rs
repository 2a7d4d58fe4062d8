//! Maps an output format and quality to the matching `image` encoder.
//!
//! Quality only reaches the JPEG encoder. PNG, GIF, BMP and TIFF have no
//! lossy quality parameter and the available WebP encoder is lossless, so for
//! those formats quality is accepted and ignored.

use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage};
use tracing::debug;

use crate::utils::{ConverterError, ConverterResult, OutputFormat};

type Result<T> = ConverterResult<T>;

/// Maps `[0.0, 1.0]` quality onto the JPEG encoder's `1..=100` scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    ((quality.clamp(0.0, 1.0) * 100.0).round() as u8).max(1)
}

/// Encodes the full `image` surface as `format`.
pub fn encode(image: &DynamicImage, format: OutputFormat, quality: f32) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());

    match format {
        OutputFormat::Jpeg => encode_jpeg(image, &mut buffer, quality)?,
        other => {
            debug!("Quality {:.2} ignored by {} encoder", quality, other);
            let pixels = normalise_pixels(image, other);
            pixels
                .write_to(&mut buffer, other.as_image_format())
                .map_err(|e| ConverterError::encode(format!("{other} encode failed: {e}")))?;
        }
    }

    Ok(buffer.into_inner())
}

/// JPEG has no alpha channel; like a canvas export, alpha is dropped rather than rejected.
fn encode_jpeg(image: &DynamicImage, buffer: &mut Cursor<Vec<u8>>, quality: f32) -> Result<()> {
    let rgb = image.to_rgb8();
    let mut encoder = JpegEncoder::new_with_quality(buffer, jpeg_quality(quality));
    encoder
        .encode_image(&rgb)
        .map_err(|e| ConverterError::encode(format!("jpeg encode failed: {e}")))
}

/// Converts to a pixel layout the target encoder accepts, borrowing when it already does.
fn normalise_pixels(image: &DynamicImage, format: OutputFormat) -> Cow<'_, DynamicImage> {
    use ColorType::*;

    let supported = match format {
        OutputFormat::Png => matches!(
            image.color(),
            L8 | La8 | Rgb8 | Rgba8 | L16 | La16 | Rgb16 | Rgba16
        ),
        OutputFormat::Gif => matches!(image.color(), Rgba8),
        OutputFormat::WebP | OutputFormat::Bmp | OutputFormat::Tiff => {
            matches!(image.color(), L8 | Rgb8 | Rgba8)
        }
        OutputFormat::Jpeg => matches!(image.color(), Rgb8),
    };

    if supported {
        Cow::Borrowed(image)
    } else {
        debug!("Converting {:?} pixels to Rgba8 for {}", image.color(), format);
        Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8()))
    }
}
