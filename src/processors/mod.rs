//! Raster primitives the segmentation passes are built from.
//!
//! Every function here is pure: it takes a raster or mask and returns a new
//! value without touching its input.
//!
//! # Modules
//!
//! * `binarize` - Fixed and Otsu inverted thresholding into [`BinaryMask`]
//! * `contours` - Outer-contour extraction into [`crate::domain::Region`]s
//! * `edges` - Canny edge detection for the diagram pass
//! * `filter` - Area and size filters over bounded items
//! * `morphology` - Rectangular dilation with a [`KernelSize`]
//! * `resize` - Width normalization and crop resizing
//! * `sorting` - Stable reading-order sorts
//! * `types` - Small enums shared across the processors

pub mod binarize;
pub mod contours;
pub mod edges;
pub mod filter;
pub mod morphology;
pub mod resize;
pub mod sorting;
pub mod types;

pub use binarize::{
    BinaryMask, binarize, binarize_gray, binarize_otsu, binarize_otsu_gray, binarize_with,
    to_intensity,
};
pub use contours::extract_contours;
pub use edges::detect_edges;
pub use filter::{filter_by_area, filter_by_size};
pub use morphology::{KernelSize, dilate};
pub use resize::{NormalizedRaster, normalize_width, resize_area, resize_square};
pub use sorting::{is_ordered, order_regions, ordered};
pub use types::{SortAxis, ThresholdMode};
