//! Configuration management for the segmentation pipeline.
//!
//! This module provides the validation trait implemented (mostly through
//! `#[derive(ConfigValidator)]`) by every configuration type, and the
//! parallel policy shared by the per-line and per-word passes.

pub mod errors;
pub mod parallel;

pub use errors::{ConfigDefaults, ConfigError, ConfigValidator};
pub use parallel::ParallelPolicy;
