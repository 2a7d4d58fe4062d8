//! Conversion of a single item's bytes.
//!
//! Decoding and encoding are CPU-bound, so each conversion runs inside
//! `tokio::task::spawn_blocking` and the async caller is suspended rather
//! than blocked.

use std::sync::Arc;
use tracing::debug;

use crate::utils::{ConverterError, ConverterResult, OutputFormat, validate_quality};

use super::encoders::encode;

/// Converts raw image bytes into another encoding.
///
/// Holds no cache: every call decodes and re-encodes in full, so identical
/// inputs repeat the work.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionEngine;

impl ConversionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decodes `source` to a pixel surface at its natural size and re-encodes
    /// the whole surface, unscaled, as `format`.
    ///
    /// Fails with [`ConverterError::Decode`] when `source` is not a supported
    /// image and [`ConverterError::Encode`] when `format` cannot be produced.
    pub async fn convert(
        &self,
        source: Arc<[u8]>,
        format: OutputFormat,
        quality: f32,
    ) -> ConverterResult<Vec<u8>> {
        validate_quality(quality)?;
        tokio::task::spawn_blocking(move || convert_blocking(&source, format, quality)).await?
    }
}

// ── Blocking image processing (runs on tokio's blocking thread pool) ──────────────────

fn convert_blocking(source: &[u8], format: OutputFormat, quality: f32) -> ConverterResult<Vec<u8>> {
    let image = image::load_from_memory(source)
        .map_err(|e| ConverterError::decode(format!("Failed to decode source image: {e}")))?;

    debug!(
        "Decoded {}×{} {:?} surface, encoding as {}",
        image.width(),
        image.height(),
        image.color(),
        format
    );

    let encoded = encode(&image, format, quality)?;

    debug!("{} → {} bytes", source.len(), encoded.len());
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Arc<[u8]> {
        let image = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 7) as u8, (y * 5) as u8, 90]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner().into()
    }

    #[tokio::test]
    async fn test_png_to_jpeg_keeps_dimensions() {
        let engine = ConversionEngine::new();
        let output = engine.convert(png_bytes(32, 16), OutputFormat::Jpeg, 0.8).await.unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[tokio::test]
    async fn test_every_format_is_produced() {
        let engine = ConversionEngine::new();
        let source = png_bytes(8, 8);
        for format in OutputFormat::ALL {
            let output = engine.convert(Arc::clone(&source), format, 0.5).await.unwrap();
            assert_eq!(
                image::guess_format(&output).unwrap(),
                format.as_image_format(),
                "wrong signature for {format}"
            );
        }
    }

    #[tokio::test]
    async fn test_garbage_is_a_decode_error() {
        let engine = ConversionEngine::new();
        let result = engine
            .convert(Arc::from(&b"definitely not an image"[..]), OutputFormat::Png, 0.8)
            .await;
        assert!(matches!(result, Err(ConverterError::Decode(_))));

        let truncated: Arc<[u8]> = Arc::from(&png_bytes(16, 16)[..20]);
        let result = engine.convert(truncated, OutputFormat::Png, 0.8).await;
        assert!(matches!(result, Err(ConverterError::Decode(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_quality_is_rejected() {
        let engine = ConversionEngine::new();
        let result = engine.convert(png_bytes(4, 4), OutputFormat::Jpeg, 3.0).await;
        assert!(matches!(result, Err(ConverterError::Validation(_))));
    }

    #[tokio::test]
    async fn test_repeated_input_is_reconverted_identically() {
        let engine = ConversionEngine::new();
        let source = png_bytes(12, 12);
        let first = engine.convert(Arc::clone(&source), OutputFormat::Jpeg, 0.9).await.unwrap();
        let second = engine.convert(source, OutputFormat::Jpeg, 0.9).await.unwrap();
        assert_eq!(first, second);
    }
}
