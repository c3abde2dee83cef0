//! Types used in image processing operations
//!
//! This module defines the small enums that select between the variants of
//! the processing steps.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::SegmentationError;

/// How a raster is turned into a foreground/background mask.
///
/// The line and word passes use a fixed threshold because it is cheaper and
/// page scans have fairly uniform contrast; the character pass uses Otsu's
/// method because contrast varies from one word crop to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Pixels darker than the value are foreground.
    Fixed(u8),
    /// The threshold is chosen per raster from its histogram.
    Otsu,
}

impl Default for ThresholdMode {
    fn default() -> Self {
        ThresholdMode::Fixed(80)
    }
}

/// Parses `"otsu"` or a decimal threshold such as `"80"`.
impl FromStr for ThresholdMode {
    type Err = SegmentationError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        let mode = mode.trim();
        if mode.eq_ignore_ascii_case("otsu") {
            return Ok(ThresholdMode::Otsu);
        }
        mode.parse::<u8>().map(ThresholdMode::Fixed).map_err(|_| {
            SegmentationError::config_error(format!(
                "unsupported threshold mode '{mode}', expected 'otsu' or 0-255"
            ))
        })
    }
}

/// Reading-order axis used when sorting regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAxis {
    /// Top to bottom, by `y_min` (lines).
    Vertical,
    /// Left to right, by `x_min` (words and characters).
    Horizontal,
}
