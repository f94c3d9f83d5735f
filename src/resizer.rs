//! # Image Resizer Module
//!
//! Thin adapter over the `image` crate: decode, resize to exact dimensions
//! with Lanczos3, and re-encode to the same content type.

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::io::{Limits, Reader};
use image::{DynamicImage, ImageError};
use tracing::{debug, info};

use crate::config::ResizeConfig;
use crate::content_type::ContentType;
use crate::dimensions::Dimensions;
use crate::errors::ResizeError;

/// Resizes images according to a [`ResizeConfig`]
#[derive(Debug, Clone, Default)]
pub struct ImageResizer {
    config: ResizeConfig,
}

impl ImageResizer {
    pub fn new(config: ResizeConfig) -> Self {
        Self { config }
    }

    /// Resize `bytes` to `dimensions`, keeping the encoding of `content_type`
    ///
    /// # Errors
    ///
    /// - [`ResizeError::TooLarge`] when a side exceeds `max_side`
    /// - [`ResizeError::TooManyPixels`] when the target area or the
    ///   intermediate buffer (source width by target height) exceeds `max_pixels`
    /// - [`ResizeError::Decode`] when the bytes are not a readable image or
    ///   exceed the decoder limits
    /// - [`ResizeError::Encode`] when re-encoding fails
    pub fn resize(
        &self,
        bytes: &[u8],
        content_type: ContentType,
        dimensions: Dimensions,
    ) -> Result<Vec<u8>, ResizeError> {
        let max_side = self.config.max_side;
        if dimensions.width > max_side || dimensions.height > max_side {
            return Err(ResizeError::TooLarge {
                requested: dimensions,
                max_side,
            });
        }

        self.check_budget(dimensions, u64::from(dimensions.width) * u64::from(dimensions.height))?;

        let source = self.decode(bytes)?;
        debug!(
            source_width = source.width(),
            source_height = source.height(),
            target = %dimensions,
            content_type = %content_type,
            "Decoded image for resizing"
        );

        // The vertical pass allocates source width by target height
        self.check_budget(dimensions, u64::from(source.width()) * u64::from(dimensions.height))?;

        let resized = source.resize_exact(dimensions.width, dimensions.height, FilterType::Lanczos3);
        let encoded = encode(&resized, content_type, self.config.jpeg_quality)?;

        info!(
            target = %dimensions,
            content_type = %content_type,
            input_bytes = bytes.len(),
            output_bytes = encoded.len(),
            "Image resized"
        );
        Ok(encoded)
    }

    fn check_budget(&self, requested: Dimensions, pixels: u64) -> Result<(), ResizeError> {
        let max_pixels = self.config.max_pixels;
        if pixels > max_pixels {
            return Err(ResizeError::TooManyPixels {
                requested,
                pixels,
                max_pixels,
            });
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, ResizeError> {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.config.max_source_side);
        limits.max_image_height = Some(self.config.max_source_side);
        limits.max_alloc = Some(self.config.max_decode_bytes);

        let mut reader = Reader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ResizeError::Decode(ImageError::from(e)))?;
        reader.limits(limits);
        reader.decode().map_err(ResizeError::Decode)
    }

    /// Run [`ImageResizer::resize`] on the blocking thread pool
    pub async fn resize_blocking(
        &self,
        bytes: Arc<Vec<u8>>,
        content_type: ContentType,
        dimensions: Dimensions,
    ) -> Result<Vec<u8>, ResizeError> {
        let resizer = self.clone();
        tokio::task::spawn_blocking(move || resizer.resize(&bytes, content_type, dimensions))
            .await
            .map_err(|e| ResizeError::TaskFailed(e.to_string()))?
    }
}

/// Resize with default limits, rejecting any content type but JPEG and PNG
///
/// # Examples
///
/// ```rust,no_run
/// use resize_bot::dimensions::Dimensions;
/// use resize_bot::resizer::resize_image;
///
/// # fn example(bytes: &[u8]) -> Result<(), resize_bot::errors::ResizeError> {
/// let thumbnail = resize_image(bytes, "image/png", Dimensions::new(64, 64))?;
/// # Ok(())
/// # }
/// ```
pub fn resize_image(
    bytes: &[u8],
    content_type: &str,
    dimensions: Dimensions,
) -> Result<Vec<u8>, ResizeError> {
    let content_type = ContentType::parse(content_type)?;
    ImageResizer::default().resize(bytes, content_type, dimensions)
}

fn encode(image: &DynamicImage, content_type: ContentType, jpeg_quality: u8) -> Result<Vec<u8>, ResizeError> {
    let mut buf = Vec::new();
    match content_type {
        ContentType::Jpeg => {
            let rgb = image.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality);
            encoder.encode_image(&rgb).map_err(ResizeError::Encode)?;
        }
        ContentType::Png => {
            image
                .write_to(&mut Cursor::new(&mut buf), content_type.image_format())
                .map_err(ResizeError::Encode)?;
        }
    }
    Ok(buf)
}
