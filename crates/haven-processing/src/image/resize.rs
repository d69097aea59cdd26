use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Upper bounds for one resized rendition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeBounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl ResizeBounds {
    pub const fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.max_width > 0 && self.max_height > 0
    }
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Target dimensions for fitting `orig_width x orig_height` into `bounds`.
    ///
    /// Landscape images are clamped on width, portrait images on height; the
    /// other side follows the aspect ratio. Square images are clamped to the
    /// smaller of the two bounds so they fit the whole box. Images already
    /// inside the bound on the clamped axis keep their size.
    pub fn fit_within(orig_width: u32, orig_height: u32, bounds: ResizeBounds) -> (u32, u32) {
        if orig_width == 0 || orig_height == 0 {
            return (orig_width.max(1), orig_height.max(1));
        }

        if orig_width == orig_height {
            let side = bounds.max_width.min(bounds.max_height);
            return if orig_width <= side {
                (orig_width, orig_height)
            } else {
                (side, side)
            };
        }

        if orig_width > orig_height {
            if orig_width <= bounds.max_width {
                return (orig_width, orig_height);
            }
            let h = (bounds.max_width as f64 * orig_height as f64 / orig_width as f64).round() as u32;
            (bounds.max_width, h.max(1))
        } else {
            if orig_height <= bounds.max_height {
                return (orig_width, orig_height);
            }
            let w = (bounds.max_height as f64 * orig_width as f64 / orig_height as f64).round() as u32;
            (w.max(1), bounds.max_height)
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize image to fit `bounds`. Returns a copy when no resize is needed.
    pub fn resize_to_fit(img: &DynamicImage, bounds: ResizeBounds) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::fit_within(orig_width, orig_height, bounds);

        if (width, height) == (orig_width, orig_height) {
            return img.clone();
        }

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const SMALL: ResizeBounds = ResizeBounds::new(300, 200);
    const LARGE: ResizeBounds = ResizeBounds::new(800, 600);

    #[test]
    fn test_landscape_clamps_width() {
        assert_eq!(ImageResize::fit_within(1200, 800, SMALL), (300, 200));
        assert_eq!(ImageResize::fit_within(1200, 800, LARGE), (800, 533));
    }

    #[test]
    fn test_portrait_clamps_height() {
        assert_eq!(ImageResize::fit_within(800, 1200, SMALL), (133, 200));
        assert_eq!(ImageResize::fit_within(800, 1200, LARGE), (400, 600));
    }

    #[test]
    fn test_square_fits_whole_box() {
        assert_eq!(ImageResize::fit_within(1000, 1000, SMALL), (200, 200));
        assert_eq!(ImageResize::fit_within(1000, 1000, LARGE), (600, 600));
        assert_eq!(ImageResize::fit_within(150, 150, SMALL), (150, 150));
        assert_eq!(ImageResize::fit_within(500, 500, ResizeBounds::new(100, 400)), (100, 100));
    }

    #[test]
    fn test_no_upscaling() {
        assert_eq!(ImageResize::fit_within(120, 80, LARGE), (120, 80));
        assert_eq!(ImageResize::fit_within(50, 150, SMALL), (50, 150));
    }

    #[test]
    fn test_extreme_aspect_ratio_keeps_one_pixel() {
        assert_eq!(ImageResize::fit_within(10_000, 2, SMALL), (300, 1));
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(ImageResize::select_filter(1200, 800, 300, 200), FilterType::Triangle);
        assert_eq!(ImageResize::select_filter(1000, 1000, 600, 600), FilterType::CatmullRom);
        assert_eq!(ImageResize::select_filter(900, 600, 800, 533), FilterType::Lanczos3);
    }

    #[test]
    fn test_resize_to_fit() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let resized = ImageResize::resize_to_fit(&img, SMALL);
        assert_eq!(resized.dimensions(), (300, 225));

        let untouched = ImageResize::resize_to_fit(&img, LARGE);
        assert_eq!(untouched.dimensions(), (640, 480));
    }

    #[test]
    fn test_bounds_validity() {
        assert!(SMALL.is_valid());
        assert!(!ResizeBounds::new(0, 200).is_valid());
    }
}
