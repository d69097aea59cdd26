//! Test fixtures: encoded images generated on the fly.

use std::io::Cursor;

use haven_core::SourceImage;
use image::{DynamicImage, ImageFormat, RgbImage};

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture image");
    buffer
}

pub fn jpeg(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::new(name, "image/jpeg", encode(width, height, ImageFormat::Jpeg))
}

pub fn png(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::new(name, "image/png", encode(width, height, ImageFormat::Png))
}

/// Bytes that claim to be a JPEG but do not decode.
pub fn corrupt_jpeg(name: &str) -> SourceImage {
    SourceImage::new(name, "image/jpeg", b"\xFF\xD8\xFF not really a jpeg".to_vec())
}

/// Three landscape listing photos.
pub fn listing_photos() -> Vec<SourceImage> {
    vec![
        jpeg("front.jpg", 1200, 800),
        jpeg("kitchen.jpg", 900, 600),
        jpeg("garden.jpg", 640, 480),
    ]
}
