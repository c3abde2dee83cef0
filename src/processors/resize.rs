//! Resizing of page rasters and region crops.
//!
//! Pages wider than the configured cap are shrunk with area averaging before
//! any pass runs. This bounds the cost of dilation and contour tracing and
//! keeps kernel sizes meaningful across scan resolutions. Character crops are
//! resized to a fixed square for the classifier.

use std::borrow::Cow;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};

use crate::core::errors::{SegmentationError, SegmentationResult};

/// A page raster after width normalization.
#[derive(Debug, Clone)]
pub struct NormalizedRaster<'a> {
    /// The raster the passes run on; borrowed when no resize was needed.
    pub image: Cow<'a, DynamicImage>,
    /// Normalized width divided by submitted width (1.0 when unchanged).
    pub scale: f64,
}

impl NormalizedRaster<'_> {
    pub fn was_resized(&self) -> bool {
        matches!(self.image, Cow::Owned(_))
    }
}

/// Caps the raster width at `max_width`, preserving the aspect ratio.
///
/// A raster that is already at most `max_width` wide is returned borrowed and
/// untouched. Otherwise the new height is `floor(max_width / (w / h))` (at
/// least 1) and the pixels are area-averaged.
///
/// # Errors
///
/// Returns `InvalidInput` for a zero-sized raster and a configuration error
/// for a zero `max_width`.
pub fn normalize_width(
    raster: &DynamicImage,
    max_width: u32,
) -> SegmentationResult<NormalizedRaster<'_>> {
    let (width, height) = (raster.width(), raster.height());
    if width == 0 || height == 0 {
        return Err(SegmentationError::invalid_input(format!(
            "raster must have non-zero dimensions, got {width}x{height}"
        )));
    }
    if max_width == 0 {
        return Err(SegmentationError::config_error("max_width must be at least 1"));
    }

    if width <= max_width {
        return Ok(NormalizedRaster {
            image: Cow::Borrowed(raster),
            scale: 1.0,
        });
    }

    let aspect = f64::from(width) / f64::from(height);
    let new_height = ((f64::from(max_width) / aspect) as u32).max(1);
    let resized = resize_area(raster, max_width, new_height)?;

    Ok(NormalizedRaster {
        image: Cow::Owned(resized),
        scale: f64::from(max_width) / f64::from(width),
    })
}

/// Resizes by area averaging: every output pixel is the mean of the source
/// pixels it covers, weighted by coverage.
///
/// Grayscale rasters stay grayscale; every other pixel format is resampled as
/// 8-bit RGB. Enlarging falls back to bilinear filtering, where area
/// averaging has no meaning.
///
/// # Errors
///
/// Returns `InvalidInput` when either the source or the target is empty.
pub fn resize_area(
    raster: &DynamicImage,
    width: u32,
    height: u32,
) -> SegmentationResult<DynamicImage> {
    let (src_w, src_h) = (raster.width(), raster.height());
    if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
        return Err(SegmentationError::invalid_input(format!(
            "cannot resize {src_w}x{src_h} to {width}x{height}"
        )));
    }
    if (width, height) == (src_w, src_h) {
        return Ok(raster.clone());
    }
    if width > src_w || height > src_h {
        return Ok(raster.resize_exact(width, height, FilterType::Triangle));
    }

    let resized = match raster {
        DynamicImage::ImageLuma8(gray) => {
            let data = resample_area(gray.as_raw(), src_w, src_h, 1, width, height);
            GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
        }
        other => {
            let rgb = other.to_rgb8();
            let data = resample_area(rgb.as_raw(), src_w, src_h, 3, width, height);
            RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
        }
    };

    resized.ok_or_else(|| {
        SegmentationError::invalid_input("resampled buffer does not match the target size")
    })
}

/// Resizes a crop to `size x size` with bilinear filtering.
pub fn resize_square(crop: &DynamicImage, size: u32) -> DynamicImage {
    crop.resize_exact(size, size, FilterType::Triangle)
}

/// Source taps and weights for each output index along one axis.
fn area_weights(src: u32, dst: u32) -> Vec<Vec<(usize, f32)>> {
    let scale = f64::from(src) / f64::from(dst);
    (0..dst)
        .map(|o| {
            let start = f64::from(o) * scale;
            let end = (f64::from(o + 1) * scale).min(f64::from(src));
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src);
            (first..last)
                .filter_map(|i| {
                    let covered = end.min(f64::from(i + 1)) - start.max(f64::from(i));
                    (covered > 1e-9).then(|| (i as usize, (covered / scale) as f32))
                })
                .collect()
        })
        .collect()
}

fn resample_area(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    channels: usize,
    dst_w: u32,
    dst_h: u32,
) -> Vec<u8> {
    let x_taps = area_weights(src_w, dst_w);
    let y_taps = area_weights(src_h, dst_h);
    let (src_w, src_h, dst_w) = (src_w as usize, src_h as usize, dst_w as usize);

    let mut rows = vec![0f32; src_h * dst_w * channels];
    for y in 0..src_h {
        for (ox, taps) in x_taps.iter().enumerate() {
            for c in 0..channels {
                let acc: f32 = taps
                    .iter()
                    .map(|&(sx, weight)| f32::from(src[(y * src_w + sx) * channels + c]) * weight)
                    .sum();
                rows[(y * dst_w + ox) * channels + c] = acc;
            }
        }
    }

    let mut out = vec![0u8; y_taps.len() * dst_w * channels];
    for (oy, taps) in y_taps.iter().enumerate() {
        for ox in 0..dst_w {
            for c in 0..channels {
                let acc: f32 = taps
                    .iter()
                    .map(|&(sy, weight)| rows[(sy * dst_w + ox) * channels + c] * weight)
                    .sum();
                out[(oy * dst_w + ox) * channels + c] = acc.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_narrow_raster_is_borrowed_unchanged() {
        let raster = DynamicImage::ImageLuma8(GrayImage::from_pixel(800, 600, Luma([200])));
        let normalized = normalize_width(&raster, 1000).unwrap();
        assert!(!normalized.was_resized());
        assert_eq!(normalized.scale, 1.0);
        assert_eq!(normalized.image.width(), 800);
        assert_eq!(normalized.image.height(), 600);

        let exact = normalize_width(&raster, 800).unwrap();
        assert!(!exact.was_resized());
    }

    #[test]
    fn test_wide_raster_is_capped() {
        let raster = DynamicImage::ImageRgb8(RgbImage::from_pixel(2000, 1001, Rgb([10, 20, 30])));
        let normalized = normalize_width(&raster, 1000).unwrap();
        assert!(normalized.was_resized());
        assert_eq!(normalized.image.width(), 1000);
        // floor(1000 / (2000 / 1001)) = 500
        assert_eq!(normalized.image.height(), 500);
        assert_eq!(normalized.scale, 0.5);
        let px = normalized.image.to_rgb8().get_pixel(10, 10).0;
        assert_eq!(px, [10, 20, 30]);
    }

    #[test]
    fn test_zero_sized_input() {
        let raster = DynamicImage::ImageLuma8(GrayImage::new(0, 10));
        assert!(normalize_width(&raster, 1000).unwrap_err().is_invalid_input());
        let ok = DynamicImage::ImageLuma8(GrayImage::new(10, 10));
        assert!(normalize_width(&ok, 0).unwrap_err().is_config_error());
    }

    #[test]
    fn test_area_average_halves() {
        // Columns alternate 0 / 200, so every 2x2 block averages to 100.
        let gray = GrayImage::from_fn(8, 4, |x, _| if x % 2 == 0 { Luma([0]) } else { Luma([200]) });
        let resized = resize_area(&DynamicImage::ImageLuma8(gray), 4, 2).unwrap();
        let resized = resized.as_luma8().unwrap();
        assert!(resized.pixels().all(|p| p[0] == 100));
    }

    #[test]
    fn test_area_average_fractional_scale() {
        let gray = GrayImage::from_fn(3, 1, |x, _| Luma([[0, 90, 180][x as usize]]));
        let resized = resize_area(&DynamicImage::ImageLuma8(gray), 2, 1).unwrap();
        let resized = resized.as_luma8().unwrap();
        // Output 0 covers source [0, 1.5): (0 * 1 + 90 * 0.5) / 1.5 = 30.
        assert_eq!(resized.get_pixel(0, 0)[0], 30);
        // Output 1 covers source [1.5, 3): (90 * 0.5 + 180 * 1) / 1.5 = 150.
        assert_eq!(resized.get_pixel(1, 0)[0], 150);
    }

    #[test]
    fn test_resize_square() {
        let crop = DynamicImage::ImageLuma8(GrayImage::new(13, 40));
        let square = resize_square(&crop, 64);
        assert_eq!((square.width(), square.height()), (64, 64));
    }
}
