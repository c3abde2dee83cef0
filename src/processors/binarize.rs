//! Binarization of page rasters into foreground/background masks.
//!
//! Dark ink on light paper is foreground. The fixed-threshold variant is used
//! for the line and word passes, the Otsu variant for character crops.

use std::borrow::Cow;

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;

use crate::core::errors::{SegmentationError, SegmentationResult};
use crate::domain::Region;
use crate::processors::types::ThresholdMode;

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// A binary foreground/background grid.
///
/// Stored as a `GrayImage` holding only 0 and 255 so it can be handed to
/// `imageproc` routines without conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: GrayImage,
}

impl BinaryMask {
    /// An all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Builds a mask from a predicate over pixel coordinates.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        Self {
            image: GrayImage::from_fn(width, height, |x, y| {
                Luma([if f(x, y) { FOREGROUND } else { BACKGROUND }])
            }),
        }
    }

    /// Wraps a grayscale image, treating every non-zero pixel as foreground.
    pub fn from_gray(mut image: GrayImage) -> Self {
        for value in image.iter_mut() {
            *value = if *value > 0 { FOREGROUND } else { BACKGROUND };
        }
        Self { image }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[inline]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] == FOREGROUND
    }

    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        let value = if foreground { FOREGROUND } else { BACKGROUND };
        self.image.put_pixel(x, y, Luma([value]));
    }

    pub fn foreground_count(&self) -> usize {
        self.image.iter().filter(|&&v| v == FOREGROUND).count()
    }

    pub fn is_blank(&self) -> bool {
        self.image.iter().all(|&v| v == BACKGROUND)
    }

    /// Row-major raw values, one byte (0 or 255) per pixel.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// Copies the part of the mask covered by `region`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the region does not fit inside the mask.
    pub fn crop(&self, region: &Region) -> SegmentationResult<BinaryMask> {
        if !region.fits_within(self.width(), self.height()) {
            return Err(SegmentationError::invalid_input(format!(
                "region {:?} exceeds mask of {}x{}",
                region.as_xywh(),
                self.width(),
                self.height()
            )));
        }
        let (x, y, w, h) = region.as_xywh();
        let view = image::imageops::crop_imm(&self.image, x, y, w, h);
        Ok(Self {
            image: view.to_image(),
        })
    }
}

/// Returns the single-channel intensity view of a raster, borrowing when the
/// raster already is 8-bit grayscale.
pub fn to_intensity(raster: &DynamicImage) -> Cow<'_, GrayImage> {
    match raster {
        DynamicImage::ImageLuma8(gray) => Cow::Borrowed(gray),
        other => Cow::Owned(other.to_luma8()),
    }
}

fn ensure_non_empty(width: u32, height: u32) -> SegmentationResult<()> {
    if width == 0 || height == 0 {
        return Err(SegmentationError::invalid_input(format!(
            "raster must have non-zero dimensions, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Inverted binary threshold on an intensity image: `intensity < threshold`
/// becomes foreground.
pub fn binarize_gray(gray: &GrayImage, threshold: u8) -> BinaryMask {
    let mut image = gray.clone();
    for value in image.iter_mut() {
        *value = if *value < threshold {
            FOREGROUND
        } else {
            BACKGROUND
        };
    }
    BinaryMask { image }
}

/// Converts `raster` to intensity and applies an inverted fixed threshold.
///
/// # Errors
///
/// Returns `InvalidInput` for a zero-width or zero-height raster.
pub fn binarize(raster: &DynamicImage, threshold: u8) -> SegmentationResult<BinaryMask> {
    ensure_non_empty(raster.width(), raster.height())?;
    Ok(binarize_gray(&to_intensity(raster), threshold))
}

/// Inverted binary threshold with the level chosen by Otsu's method.
///
/// Pixels at or below the Otsu level (the darker class) become foreground. A
/// raster with a single intensity has no second class and yields an empty
/// mask. Returns the mask together with the chosen level.
pub fn binarize_otsu_gray(gray: &GrayImage) -> (BinaryMask, u8) {
    let (lo, hi) = gray
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo >= hi {
        return (BinaryMask::new(gray.width(), gray.height()), lo);
    }

    let level = otsu_level(gray);
    let mut image = gray.clone();
    for value in image.iter_mut() {
        *value = if *value <= level {
            FOREGROUND
        } else {
            BACKGROUND
        };
    }
    (BinaryMask { image }, level)
}

/// Converts `raster` to intensity and binarizes it with Otsu's method.
///
/// # Errors
///
/// Returns `InvalidInput` for a zero-width or zero-height raster.
pub fn binarize_otsu(raster: &DynamicImage) -> SegmentationResult<(BinaryMask, u8)> {
    ensure_non_empty(raster.width(), raster.height())?;
    Ok(binarize_otsu_gray(&to_intensity(raster)))
}

/// Binarizes `raster` with the given mode.
pub fn binarize_with(raster: &DynamicImage, mode: ThresholdMode) -> SegmentationResult<BinaryMask> {
    match mode {
        ThresholdMode::Fixed(threshold) => binarize(raster, threshold),
        ThresholdMode::Otsu => binarize_otsu(raster).map(|(mask, _)| mask),
    }
}
