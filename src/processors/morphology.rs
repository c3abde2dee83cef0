//! Directional dilation used to group strokes into word and line blobs.
//!
//! A wide, short rectangular structuring element merges ink horizontally
//! while barely thickening it vertically. Run with a long kernel it turns a
//! whole text line into one blob; with a shorter kernel it merges letters of
//! a word without bridging the gaps between words.
//!
//! The dilation itself is `imageproc`'s mask-based grayscale dilation, which
//! on a 0/255 mask is exactly binary dilation.

use image::{GrayImage, Luma};
use imageproc::morphology::{Mask, grayscale_dilate};
use inkseg_derive::ConfigValidator;
use serde::{Deserialize, Serialize};

use crate::core::config::ConfigValidator as _;
use crate::core::errors::SegmentationResult;
use crate::processors::binarize::BinaryMask;

/// Size of a rectangular structuring element, in pixels.
///
/// Each side is limited to 511 pixels, the largest footprint `imageproc`
/// masks can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ConfigValidator)]
pub struct KernelSize {
    #[validate(range(min = 1, max = 511))]
    pub width: u32,
    #[validate(range(min = 1, max = 511))]
    pub height: u32,
}

impl KernelSize {
    /// Kernel that merges a full handwritten line on a page capped at 1000px.
    pub const LINE: KernelSize = KernelSize::new(85, 3);
    /// Kernel that merges the letters of one word.
    pub const WORD: KernelSize = KernelSize::new(15, 3);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Offset of the anchor from the left edge (integer centre).
    pub fn anchor_x(&self) -> u32 {
        self.width / 2
    }

    /// Offset of the anchor from the top edge (integer centre).
    pub fn anchor_y(&self) -> u32 {
        self.height / 2
    }

    /// The full rectangle as an `imageproc` mask anchored at the integer centre.
    fn footprint(&self) -> Mask {
        let element = GrayImage::from_pixel(self.width, self.height, Luma([255]));
        // Validated sides are at most 511, so both anchors fit in a u8.
        Mask::from_image(&element, self.anchor_x() as u8, self.anchor_y() as u8)
    }
}

/// The identity element: dilating with it leaves a mask unchanged.
impl Default for KernelSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Binary dilation of `mask` with a `kernel.width x kernel.height` rectangle.
///
/// A pixel becomes foreground if any input pixel under the kernel footprint
/// anchored on it is foreground. The footprint spans
/// `[x - anchor_x, x - anchor_x + width - 1]` horizontally (likewise
/// vertically); pixels outside the mask count as background.
///
/// # Errors
///
/// Returns a configuration error when a kernel side is zero or above 511.
pub fn dilate(mask: &BinaryMask, kernel: KernelSize) -> SegmentationResult<BinaryMask> {
    kernel.validate()?;

    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 || kernel == KernelSize::default() {
        return Ok(mask.clone());
    }

    Ok(BinaryMask::from_gray(grayscale_dilate(
        mask.as_image(),
        &kernel.footprint(),
    )))
}
