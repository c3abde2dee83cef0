//! Shared parallel processing configuration.

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};

/// Controls how the per-line word pass and the per-word character pass fan out.
///
/// Each line's word pass and each word's character pass only read their own
/// crop, so they are mapped over `rayon` when there is enough work to split.
/// Results are always re-sorted after collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of threads to use for parallel processing.
    /// If None, rayon's global pool is used (typically one thread per core).
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Number of lines processed sequentially (more than this runs the word pass in parallel).
    /// Default: 1
    #[serde(default = "ParallelPolicy::default_line_threshold")]
    pub line_threshold: usize,

    /// Number of words processed sequentially (more than this runs the character pass in parallel).
    /// Default: 4
    #[serde(default = "ParallelPolicy::default_word_threshold")]
    pub word_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that never fans out.
    pub fn sequential() -> Self {
        Self {
            max_threads: Some(1),
            line_threshold: usize::MAX,
            word_threshold: usize::MAX,
        }
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the line threshold.
    pub fn with_line_threshold(mut self, threshold: usize) -> Self {
        self.line_threshold = threshold;
        self
    }

    /// Set the word threshold.
    pub fn with_word_threshold(mut self, threshold: usize) -> Self {
        self.word_threshold = threshold;
        self
    }

    /// Whether the word pass over `line_count` lines should run in parallel.
    pub fn parallel_lines(&self, line_count: usize) -> bool {
        line_count > self.line_threshold
    }

    /// Whether the character pass over `word_count` words should run in parallel.
    pub fn parallel_words(&self, word_count: usize) -> bool {
        word_count > self.word_threshold
    }

    fn default_line_threshold() -> usize {
        1
    }

    fn default_word_threshold() -> usize {
        4
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            line_threshold: Self::default_line_threshold(),
            word_threshold: Self::default_word_threshold(),
        }
    }
}

impl ConfigValidator for ParallelPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threads) = self.max_threads {
            self.validate_thread_count(threads)?;
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_policy_serialization() {
        let policy = ParallelPolicy::new()
            .with_max_threads(Some(4))
            .with_line_threshold(2);

        let json = serde_json::to_string(&policy).unwrap();
        let deserialized: ParallelPolicy = serde_json::from_str(&json).unwrap();

        assert_eq!(policy, deserialized);
    }

    #[test]
    fn test_parallel_policy_partial_json_uses_defaults() {
        let policy: ParallelPolicy = serde_json::from_str(r#"{"max_threads": 2}"#).unwrap();
        assert_eq!(policy.max_threads, Some(2));
        assert_eq!(policy.line_threshold, 1);
        assert_eq!(policy.word_threshold, 4);
    }

    #[test]
    fn test_thresholds() {
        let policy = ParallelPolicy::default();
        assert!(!policy.parallel_lines(1));
        assert!(policy.parallel_lines(2));
        assert!(!policy.parallel_words(4));
        assert!(policy.parallel_words(5));

        let sequential = ParallelPolicy::sequential();
        assert!(!sequential.parallel_lines(10_000));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let policy = ParallelPolicy::new().with_max_threads(Some(0));
        assert!(policy.validate().is_err());
    }
}
