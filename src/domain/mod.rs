//! Domain-level structures shared across the segmentation pipeline.
//!
//! Regions are plain values: they carry coordinates and an area measure but
//! never pixel data. Pixel content is re-derived from the page raster on
//! demand (see [`crate::utils::crop_region`]).

pub mod page;
pub mod recognized;
pub mod region;

pub use page::{Character, Diagram, Line, PageSegmentation, Word};
pub use recognized::{RecognizedLine, RecognizedPage, RecognizedWord};
pub use region::{Bounded, Region};
