//! Raw bytes -> normalized `[1, H, W, 3]` tensor
//!
//! The pipeline is: signature sniff, decode, RGB conversion, bilinear
//! resize, divide by 255, add the batch dimension. Every intermediate
//! buffer is scoped to this call; the returned tensor is the only
//! allocation that survives, on success and on every failure path alike.

use image::imageops::{self, FilterType};
use ndarray::Array4;
use tracing::warn;

use crate::domain::imaging::{ImageFormat, ImageTensor};
use crate::domain::DomainError;

/// Validates and normalizes uploaded image bytes for the classifier
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    input_size: u32,
}

impl ImagePreprocessor {
    /// Create a preprocessor targeting a square input resolution agreed
    /// with the classifier (e.g. 224).
    pub fn new(input_size: u32) -> Self {
        Self { input_size }
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Preprocess one uploaded image.
    ///
    /// The declared MIME hint is advisory only; the byte signature decides.
    pub fn preprocess(
        &self,
        bytes: &[u8],
        mime_hint: Option<&str>,
    ) -> Result<ImageTensor, DomainError> {
        let format = ImageFormat::sniff(bytes).ok_or_else(|| {
            DomainError::unsupported_format("no known image signature detected")
        })?;

        if let Some(hint) = mime_hint {
            if !hint.eq_ignore_ascii_case(format.mime_type()) {
                warn!(
                    declared = hint,
                    detected = %format,
                    "declared MIME type does not match byte signature; trusting signature"
                );
            }
        }

        if !format.is_accepted() {
            return Err(DomainError::unsupported_format(format!(
                "{} images are not accepted; upload JPEG, PNG, or WebP",
                format
            )));
        }

        // Decode and resize in an inner scope so the full-resolution buffers
        // are released before the tensor is built.
        let resized = {
            let decoded = image::load_from_memory_with_format(bytes, decoder_format(format))
                .map_err(|e| DomainError::decode(format!("failed to decode {}: {}", format, e)))?;
            let rgb = decoded.into_rgb8();
            imageops::resize(&rgb, self.input_size, self.input_size, FilterType::Triangle)
        };

        let size = self.input_size as usize;
        let data = Array4::from_shape_fn((1, size, size, 3), |(_, y, x, c)| {
            f32::from(resized.get_pixel(x as u32, y as u32).0[c]) / 255.0
        });
        drop(resized);

        ImageTensor::new(data)
    }
}

fn decoder_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Gif => image::ImageFormat::Gif,
        ImageFormat::Bmp => image::ImageFormat::Bmp,
        ImageFormat::WebP => image::ImageFormat::WebP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(format: image::ImageFormat) -> Vec<u8> {
        let mut img = RgbImage::new(32, 24);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 8) as u8, (y * 10) as u8, 128]);
        }
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, format)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_png_produces_fixed_shape_normalized_tensor() {
        let preprocessor = ImagePreprocessor::new(224);
        let tensor = preprocessor
            .preprocess(&encode(image::ImageFormat::Png), Some("image/png"))
            .unwrap();

        assert_eq!(tensor.dims(), (224, 224));
        assert!(tensor.is_normalized());
    }

    #[test]
    fn test_jpeg_accepted() {
        let preprocessor = ImagePreprocessor::new(64);
        let tensor = preprocessor
            .preprocess(&encode(image::ImageFormat::Jpeg), None)
            .unwrap();
        assert_eq!(tensor.dims(), (64, 64));
    }

    #[test]
    fn test_mime_hint_is_not_trusted() {
        // PNG bytes declared as JPEG still decode as PNG.
        let preprocessor = ImagePreprocessor::new(32);
        let tensor = preprocessor
            .preprocess(&encode(image::ImageFormat::Png), Some("image/jpeg"))
            .unwrap();
        assert_eq!(tensor.dims(), (32, 32));
    }

    #[test]
    fn test_gif_rejected_by_policy() {
        let preprocessor = ImagePreprocessor::new(32);
        let err = preprocessor.preprocess(b"GIF89a...........", None).unwrap_err();
        match err {
            DomainError::UnsupportedFormat { message } => {
                assert!(message.contains("GIF"));
            }
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_bmp_rejected_by_policy() {
        let preprocessor = ImagePreprocessor::new(32);
        let err = preprocessor.preprocess(&[0x42, 0x4D, 0, 0, 0, 0], None).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_garbage_bytes_unsupported() {
        let preprocessor = ImagePreprocessor::new(32);
        let err = preprocessor.preprocess(b"definitely not pixels", None).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_truncated_after_signature_is_decode_error() {
        // Valid JPEG signature, no body.
        let preprocessor = ImagePreprocessor::new(32);
        let err = preprocessor.preprocess(&[0xFF, 0xD8, 0xFF], None).unwrap_err();
        assert!(matches!(err, DomainError::Decode { .. }));
    }

    #[test]
    fn test_truncated_png_body_is_decode_error() {
        let mut bytes = encode(image::ImageFormat::Png);
        bytes.truncate(bytes.len() / 4);
        let preprocessor = ImagePreprocessor::new(32);
        let err = preprocessor.preprocess(&bytes, None).unwrap_err();
        assert!(matches!(err, DomainError::Decode { .. }));
    }
}
