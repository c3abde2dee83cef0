//! # inkseg
//!
//! Geometric segmentation of handwritten pages into lines, words, characters
//! and diagram regions, ready to be cropped and handed to a recognition model.
//!
//! ## Features
//!
//! - Fixed-threshold and Otsu binarization
//! - Directional dilation that groups strokes into line and word blobs
//! - Outer-contour extraction with an enclosed-area measure
//! - Deterministic reading order, independent of parallel scheduling
//! - Edge-based diagram extraction
//! - A [`Classifier`](recognition::Classifier) seam for external models
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration validation, parallel policy
//! * [`domain`] - Regions and the segmentation hierarchy
//! * [`processors`] - Binarization, dilation, contours, ordering, filters, resizing
//! * [`pipeline`] - The page segmenter and its configuration
//! * [`recognition`] - Classifier input preparation and page recognition
//! * [`utils`] - Image loading, cropping, logging setup and visualization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inkseg::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raster = load_image("page.jpg")?;
//! let config = SegmentationConfig::default().with_character_pass(true);
//! let segmenter = PageSegmenter::new(config)?;
//!
//! let page = segmenter.segment_page(&raster)?;
//! for (index, line) in page.lines.iter().enumerate() {
//!     println!("line {index}: {} words", line.words.len());
//! }
//!
//! // Map regions back onto the submitted raster.
//! let page = page.to_source_coordinates(raster.width(), raster.height());
//! # let _ = page;
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Configuration
//!
//! ```rust
//! use inkseg::prelude::*;
//!
//! let config = SegmentationConfig::from_json_str(
//!     r#"{ "word_kernel": { "width": 11, "height": 3 }, "min_word_area": 300.0 }"#,
//! )
//! .unwrap();
//! assert_eq!(config.word_kernel, KernelSize::new(11, 3));
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod recognition;
pub mod utils;

pub use inkseg_derive::ConfigValidator;

/// Prelude module for convenient imports.
///
/// ```rust
/// use inkseg::prelude::*;
/// ```
///
/// Included items cover segmenting a page and reading the result. Import the
/// individual processors directly from [`crate::processors`].
pub mod prelude {
    pub use crate::core::{ParallelPolicy, SegmentationError, SegmentationResult};
    pub use crate::domain::{
        Bounded, Character, Diagram, Line, PageSegmentation, RecognizedPage, Region, Word,
    };
    pub use crate::pipeline::{PageSegmenter, SegmentationConfig, extract_diagrams, segment_page};
    pub use crate::processors::KernelSize;
    pub use crate::recognition::{Classifier, ClassifierInput, RecognitionMode};
    pub use crate::utils::load_image;
}
