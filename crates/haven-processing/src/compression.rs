//! Re-encoding of resized variants in the source image's format.

use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::error::PipelineError;

/// Formats a variant can be written in. Variants always keep the source's
/// format, so this is derived from the source MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
}

impl OutputFormat {
    pub fn from_mime_type(content_type: &str) -> Option<Self> {
        match content_type.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(OutputFormat::Jpeg),
            "image/png" => Some(OutputFormat::Png),
            "image/webp" => Some(OutputFormat::WebP),
            "image/gif" => Some(OutputFormat::Gif),
            "image/bmp" | "image/x-ms-bmp" => Some(OutputFormat::Bmp),
            _ => None,
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Bmp => "image/bmp",
        }
    }
}

/// Encoder for resized variants
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode `img` as `format`. `quality` is in `(0.0, 1.0]` and only affects
    /// lossy formats; for PNG it selects the compression effort.
    pub fn compress(img: &DynamicImage, format: OutputFormat, quality: f32) -> Result<Bytes, PipelineError> {
        match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality),
            OutputFormat::WebP => Ok(Self::compress_webp(img, quality)),
            OutputFormat::Png => Self::compress_png(img, quality),
            OutputFormat::Gif => Self::write_with_format(img, ImageFormat::Gif),
            OutputFormat::Bmp => Self::write_with_format(img, ImageFormat::Bmp),
        }
    }

    /// Compress to JPEG using mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: f32) -> Result<Bytes, PipelineError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality_percent(quality));
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp
            .start_compress(Vec::new())
            .map_err(|e| PipelineError::Encode(format!("JPEG encoder failed to start: {}", e)))?;
        comp.write_scanlines(&rgb_img)
            .map_err(|e| PipelineError::Encode(format!("JPEG scanline write failed: {}", e)))?;
        let jpeg_data = comp
            .finish()
            .map_err(|e| PipelineError::Encode(format!("JPEG encoder failed to finish: {}", e)))?;

        Ok(Bytes::from(jpeg_data))
    }

    fn compress_webp(img: &DynamicImage, quality: f32) -> Bytes {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality_percent(quality));

        Bytes::copy_from_slice(&webp_data)
    }

    fn compress_png(img: &DynamicImage, quality: f32) -> Result<Bytes, PipelineError> {
        let compression = if quality >= 0.9 {
            CompressionType::Best
        } else {
            CompressionType::Default
        };

        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut buffer, compression, PngFilterType::Adaptive);
        img.write_with_encoder(encoder)
            .map_err(|e| PipelineError::Encode(format!("PNG encoding failed: {}", e)))?;

        Ok(Bytes::from(buffer))
    }

    fn write_with_format(img: &DynamicImage, format: ImageFormat) -> Result<Bytes, PipelineError> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|e| PipelineError::Encode(format!("{:?} encoding failed: {}", format, e)))?;
        Ok(Bytes::from(buffer))
    }
}

fn quality_percent(quality: f32) -> f32 {
    (quality * 100.0).clamp(1.0, 100.0)
}
