//! The core module of the segmentation library.
//!
//! This module contains the pieces every pass depends on:
//! - Error handling
//! - Configuration validation and the shared parallel policy
//!
//! It also re-exports the commonly used types for convenience.

pub mod config;
pub mod errors;

pub use config::{ConfigDefaults, ConfigError, ConfigValidator, ParallelPolicy};
pub use errors::{BoxError, SegmentationError, SegmentationResult};
