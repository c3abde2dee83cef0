//! Configuration for the segmentation pipeline.

use inkseg_derive::ConfigValidator;
use serde::{Deserialize, Serialize};

use crate::core::config::{ConfigError, ConfigValidator as _, ParallelPolicy};
use crate::core::errors::SegmentationResult;
use crate::processors::{KernelSize, ThresholdMode};

/// Tunable parameters of every segmentation pass.
///
/// Deserializes with `#[serde(default)]`, so a JSON document only needs the
/// fields it wants to change:
///
/// ```rust
/// use inkseg::pipeline::SegmentationConfig;
///
/// let config = SegmentationConfig::from_json_str(r#"{ "min_word_area": 250.0 }"#).unwrap();
/// assert_eq!(config.min_word_area, 250.0);
/// assert_eq!(config.max_width, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ConfigValidator)]
#[serde(default)]
#[validate(custom = "validate_relations")]
pub struct SegmentationConfig {
    /// Pages wider than this are downscaled before any pass runs.
    #[validate(min = 1)]
    pub max_width: u32,

    /// Fixed threshold of the line and word passes (`intensity < threshold` is ink).
    #[validate(min = 1)]
    pub threshold: u8,

    /// Binarization of word crops in the character pass.
    pub character_threshold: ThresholdMode,

    #[validate(nested)]
    pub line_kernel: KernelSize,

    #[validate(nested)]
    pub word_kernel: KernelSize,

    /// Words enclosing less area than this are dropped.
    #[validate(min = 0.0)]
    pub min_word_area: f64,

    pub min_char_width: u32,
    pub min_char_height: u32,

    /// Side of the square each character crop is resized to for classification.
    #[validate(min = 1)]
    pub char_size: u32,

    /// Diagrams narrower or shorter than this are dropped.
    pub diagram_min_size: u32,

    #[validate(range(min = 0.0, max = 1140.0))]
    pub canny_low: f32,

    #[validate(range(min = 0.0, max = 1140.0))]
    pub canny_high: f32,

    /// Run the character pass inside every word.
    pub do_character_pass: bool,

    #[validate(nested)]
    pub parallel: ParallelPolicy,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_width: 1000,
            threshold: 80,
            character_threshold: ThresholdMode::Otsu,
            line_kernel: KernelSize::LINE,
            word_kernel: KernelSize::WORD,
            min_word_area: 400.0,
            min_char_width: 5,
            min_char_height: 10,
            char_size: 64,
            diagram_min_size: 50,
            canny_low: 50.0,
            canny_high: 150.0,
            do_character_pass: false,
            parallel: ParallelPolicy::default(),
        }
    }
}

fn validate_relations(config: &SegmentationConfig) -> Result<(), ConfigError> {
    let (line, word) = (config.line_kernel, config.word_kernel);
    if line.width <= word.width {
        return Err(ConfigError::InvalidConfig {
            message: format!(
                "line kernel width ({}) must exceed word kernel width ({})",
                line.width, word.width
            ),
        });
    }
    if line.height != word.height {
        return Err(ConfigError::InvalidConfig {
            message: format!(
                "line and word kernels must share a height, got {} and {}",
                line.height, word.height
            ),
        });
    }
    if config.canny_low > config.canny_high {
        return Err(ConfigError::InvalidConfig {
            message: format!(
                "canny_low ({}) must not exceed canny_high ({})",
                config.canny_low, config.canny_high
            ),
        });
    }
    Ok(())
}

impl SegmentationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document over the defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the document is malformed or the
    /// resulting configuration is invalid.
    pub fn from_json_str(json: &str) -> SegmentationResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::ValidationFailed {
                message: format!("failed to parse configuration: {err}"),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_character_threshold(mut self, mode: ThresholdMode) -> Self {
        self.character_threshold = mode;
        self
    }

    pub fn with_kernels(mut self, line_kernel: KernelSize, word_kernel: KernelSize) -> Self {
        self.line_kernel = line_kernel;
        self.word_kernel = word_kernel;
        self
    }

    pub fn with_min_word_area(mut self, min_word_area: f64) -> Self {
        self.min_word_area = min_word_area;
        self
    }

    pub fn with_min_char_size(mut self, min_width: u32, min_height: u32) -> Self {
        self.min_char_width = min_width;
        self.min_char_height = min_height;
        self
    }

    pub fn with_char_size(mut self, char_size: u32) -> Self {
        self.char_size = char_size;
        self
    }

    pub fn with_diagram_min_size(mut self, size: u32) -> Self {
        self.diagram_min_size = size;
        self
    }

    pub fn with_canny_thresholds(mut self, low: f32, high: f32) -> Self {
        self.canny_low = low;
        self.canny_high = high;
        self
    }

    pub fn with_character_pass(mut self, enabled: bool) -> Self {
        self.do_character_pass = enabled;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::SegmentationError;

    #[test]
    fn test_defaults_are_valid() {
        let config = SegmentationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.line_kernel, KernelSize::new(85, 3));
        assert_eq!(config.word_kernel, KernelSize::new(15, 3));
        assert_eq!(config.threshold, 80);
        assert!(!config.do_character_pass);
    }

    #[test]
    fn test_zero_kernel_dimension_is_rejected() {
        let config = SegmentationConfig::default()
            .with_kernels(KernelSize::new(85, 0), KernelSize::new(15, 0));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("line_kernel"));
    }

    #[test]
    fn test_kernel_relations() {
        let narrow_line = SegmentationConfig::default()
            .with_kernels(KernelSize::new(15, 3), KernelSize::new(15, 3));
        assert!(narrow_line.validate().is_err());

        let mismatched = SegmentationConfig::default()
            .with_kernels(KernelSize::new(85, 5), KernelSize::new(15, 3));
        assert!(mismatched.validate().is_err());
    }

    #[test]
    fn test_canny_thresholds() {
        let inverted = SegmentationConfig::default().with_canny_thresholds(200.0, 100.0);
        assert!(inverted.validate().is_err());
        let out_of_range = SegmentationConfig::default().with_canny_thresholds(50.0, 2000.0);
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn test_scalar_bounds() {
        assert!(SegmentationConfig::default().with_threshold(0).validate().is_err());
        assert!(SegmentationConfig::default().with_max_width(0).validate().is_err());
        assert!(SegmentationConfig::default().with_char_size(0).validate().is_err());
        assert!(
            SegmentationConfig::default()
                .with_min_word_area(-1.0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SegmentationConfig::from_json_str(
            r#"{ "do_character_pass": true, "word_kernel": { "width": 11, "height": 3 } }"#,
        )
        .unwrap();
        assert!(config.do_character_pass);
        assert_eq!(config.word_kernel, KernelSize::new(11, 3));
        assert_eq!(config.line_kernel, KernelSize::LINE);
        assert_eq!(config.character_threshold, ThresholdMode::Otsu);
    }

    #[test]
    fn test_json_errors_surface_as_config_errors() {
        let malformed = SegmentationConfig::from_json_str("{ not json").unwrap_err();
        assert!(malformed.is_config_error());

        let invalid = SegmentationConfig::from_json_str(r#"{ "max_width": 0 }"#).unwrap_err();
        assert!(matches!(
            invalid,
            SegmentationError::Config(ConfigError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = SegmentationConfig::default()
            .with_character_pass(true)
            .with_character_threshold(ThresholdMode::Fixed(120));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SegmentationConfig::from_json_str(&json).unwrap(), config);
    }
}
