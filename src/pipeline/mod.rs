//! The segmentation pipeline.
//!
//! [`PageSegmenter`] owns a validated [`SegmentationConfig`] and runs the
//! line, word, character and diagram passes over one page at a time. The
//! free functions [`segment_page`] and [`extract_diagrams`] are one-shot
//! shortcuts around it.

mod config;
mod segmenter;

pub use config::SegmentationConfig;
pub use segmenter::{PageSegmenter, extract_diagrams, segment_page};
