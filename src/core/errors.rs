//! Error types for the segmentation pipeline.
//!
//! Only two conditions are failures of the geometric pipeline itself: an
//! unusable input raster and an invalid configuration. Everything else the
//! passes can observe (no lines, no words, no diagrams) is an empty result.
//! The remaining variants belong to the helpers around the pipeline: image
//! loading and the classifier seam.
//!
//! # Usage
//!
//! ```rust
//! use inkseg::core::errors::SegmentationError;
//!
//! let error = SegmentationError::invalid_input("raster has zero width");
//! assert!(error.is_invalid_input());
//!
//! let config_error = SegmentationError::config_error("line kernel width must be positive");
//! assert!(config_error.to_string().contains("configuration"));
//! ```

use thiserror::Error;

use crate::core::config::ConfigError;

/// Boxed error type returned by external collaborators such as classifiers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Convenient result alias for segmentation operations.
pub type SegmentationResult<T> = Result<T, SegmentationError>;

/// Enum representing the errors that can occur while segmenting a page.
#[derive(Error, Debug)]
pub enum SegmentationError {
    /// The raster or a region derived from it cannot be processed.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// The configuration failed validation. Raised before any pass runs.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred while writing an image to `path`.
    #[error("image save: {path}")]
    ImageSave {
        /// Destination that could not be written.
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// The external classifier failed on one of the supplied crops.
    #[error("classification failed: {context}")]
    Classification {
        /// Which region was being classified.
        context: String,
        /// The error reported by the classifier.
        #[source]
        source: BoxError,
    },
}

impl SegmentationError {
    /// Creates a `SegmentationError` for invalid input.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a `SegmentationError` for configuration errors.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(ConfigError::InvalidConfig {
            message: message.into(),
        })
    }

    /// Wraps a classifier failure with the region it happened on.
    ///
    /// # Arguments
    ///
    /// * `context` - Description of the region being classified.
    /// * `source` - The underlying classifier error.
    pub fn classification(context: impl Into<String>, source: BoxError) -> Self {
        Self::Classification {
            context: context.into(),
            source,
        }
    }

    /// Wraps a failure to write an image.
    pub fn image_save(path: impl Into<String>, source: image::ImageError) -> Self {
        Self::ImageSave {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error is `InvalidInput`.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Returns true if this error is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: SegmentationError = ConfigError::InvalidConfig {
            message: "threshold must be at least 1".to_string(),
        }
        .into();
        assert!(err.is_config_error());
        assert!(!err.is_invalid_input());
        assert_eq!(
            err.to_string(),
            "configuration: invalid configuration: threshold must be at least 1"
        );
    }

    #[test]
    fn test_classification_keeps_source() {
        let source: BoxError = "model not loaded".into();
        let err = SegmentationError::classification("word 3", source);
        let chained = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(chained.as_deref(), Some("model not loaded"));
    }

    #[test]
    fn test_save_failure_is_not_a_load_failure() {
        let source = image::ImageError::IoError(std::io::Error::other("disk full"));
        let err = SegmentationError::image_save("out/page.png", source);
        assert!(matches!(err, SegmentationError::ImageSave { .. }));
        assert_eq!(err.to_string(), "image save: out/page.png");
    }
}
