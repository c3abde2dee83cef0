//! Edge maps for the diagram pass.

use image::GrayImage;
use imageproc::edges::canny;

use crate::processors::binarize::BinaryMask;

/// Canny edge detection with hysteresis between `low` and `high`.
///
/// Gradient magnitudes above `high` seed edges, which are then followed
/// through neighbours above `low`. The result is used as a mask directly,
/// without a further thresholding step.
pub fn detect_edges(gray: &GrayImage, low: f32, high: f32) -> BinaryMask {
    if gray.width() == 0 || gray.height() == 0 {
        return BinaryMask::new(gray.width(), gray.height());
    }
    BinaryMask::from_gray(canny(gray, low, high))
}
