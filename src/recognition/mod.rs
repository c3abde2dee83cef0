//! The boundary to an external recognition model.
//!
//! Segmentation only locates regions. Turning a region into text is the job
//! of a [`Classifier`] supplied by the caller; this module prepares the pixel
//! input such a model expects and walks a [`PageSegmentation`] feeding it.
//!
//! Two input shapes are supported:
//!
//! - **Character** input: the crop in grayscale, resized to a `size x size`
//!   square and scaled to `[0, 1]`.
//! - **Sequence** input: the grayscale crop pasted onto a white canvas
//!   (truncated when larger), rotated 90° clockwise so the reading direction
//!   runs down the rows, and scaled to `[0, 1]`.
//!
//! # Thread safety
//!
//! A classifier is loaded once by the caller and passed in by reference. It
//! must be read-only after loading, which the `Send + Sync` bound makes
//! explicit: one instance may serve concurrent pages.

use image::imageops::{self, rotate90};
use image::{DynamicImage, GrayImage, Luma};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{BoxError, SegmentationError, SegmentationResult};
use crate::domain::{PageSegmentation, RecognizedLine, RecognizedPage, RecognizedWord, Region, Word};
use crate::processors::{resize_square, to_intensity};
use crate::utils::crop_region;

/// One prepared crop handed to a [`Classifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierInput {
    /// Where the crop came from, in the coordinates of the segmented raster.
    pub region: Region,
    /// Normalized intensities in `[0, 1]`, row-major.
    pub pixels: Array2<f32>,
}

/// An external model that maps a prepared crop to a label or text.
///
/// Implementations must not mutate shared state while classifying.
pub trait Classifier: Send + Sync {
    /// Classifies a single crop.
    fn classify(&self, input: &ClassifierInput) -> Result<String, BoxError>;

    /// Classifies several crops; the output must have one entry per input, in
    /// order. The default calls [`classify`](Self::classify) for each.
    fn classify_batch(&self, inputs: &[ClassifierInput]) -> Result<Vec<String>, BoxError> {
        inputs.iter().map(|input| self.classify(input)).collect()
    }
}

/// Canvas size of sequence-model input, before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceInputConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SequenceInputConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 64,
        }
    }
}

/// What the classifier is fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionMode {
    /// One sequence input per word; the classifier returns the whole word.
    Words(SequenceInputConfig),
    /// One square input per character; words are the concatenated labels.
    Characters { size: u32 },
}

impl RecognitionMode {
    pub fn words() -> Self {
        Self::Words(SequenceInputConfig::default())
    }

    pub fn characters(size: u32) -> Self {
        Self::Characters { size }
    }
}

/// Character-model input: grayscale, `size x size`, scaled to `[0, 1]`.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty crop or a zero `size`.
pub fn prepare_character_input(
    crop: &DynamicImage,
    size: u32,
) -> SegmentationResult<Array2<f32>> {
    if crop.width() == 0 || crop.height() == 0 || size == 0 {
        return Err(SegmentationError::invalid_input(format!(
            "cannot prepare a {}x{} crop at size {size}",
            crop.width(),
            crop.height()
        )));
    }
    let gray = resize_square(crop, size).to_luma8();
    Ok(to_unit_array(&gray))
}

/// Sequence-model input of shape `(config.width, config.height)`.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty crop or an empty canvas.
pub fn prepare_sequence_input(
    crop: &DynamicImage,
    config: SequenceInputConfig,
) -> SegmentationResult<Array2<f32>> {
    if crop.width() == 0 || crop.height() == 0 || config.width == 0 || config.height == 0 {
        return Err(SegmentationError::invalid_input(format!(
            "cannot place a {}x{} crop on a {}x{} canvas",
            crop.width(),
            crop.height(),
            config.width,
            config.height
        )));
    }
    let mut canvas = GrayImage::from_pixel(config.width, config.height, Luma([255]));
    let gray = to_intensity(crop);
    imageops::replace(&mut canvas, &*gray, 0, 0);
    Ok(to_unit_array(&rotate90(&canvas)))
}

fn to_unit_array(gray: &GrayImage) -> Array2<f32> {
    let (width, height) = gray.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        f32::from(gray.get_pixel(col as u32, row as u32)[0]) / 255.0
    })
}

/// Feeds every word (or character) of `page` to `classifier`.
///
/// `raster` must be the raster `page` was computed on, i.e. the normalized
/// page. One batch is sent per line in word mode and per word in character
/// mode.
///
/// # Errors
///
/// - `InvalidInput` if `raster` does not match the page dimensions, if
///   character mode is used on a page without a character pass, or if the
///   classifier returns the wrong number of labels.
/// - `Classification` if the classifier fails.
pub fn recognize_page<C: Classifier + ?Sized>(
    raster: &DynamicImage,
    page: &PageSegmentation,
    classifier: &C,
    mode: RecognitionMode,
) -> SegmentationResult<RecognizedPage> {
    if (raster.width(), raster.height()) != (page.width, page.height) {
        return Err(SegmentationError::invalid_input(format!(
            "raster is {}x{} but the segmentation was computed on {}x{}",
            raster.width(),
            raster.height(),
            page.width,
            page.height
        )));
    }

    let mut lines = Vec::with_capacity(page.lines.len());
    for (line_index, line) in page.lines.iter().enumerate() {
        let words = match mode {
            RecognitionMode::Words(config) => {
                let inputs = line
                    .words
                    .iter()
                    .map(|word| {
                        let crop = crop_region(raster, &word.region)?;
                        Ok(ClassifierInput {
                            region: word.region,
                            pixels: prepare_sequence_input(&crop, config)?,
                        })
                    })
                    .collect::<SegmentationResult<Vec<_>>>()?;
                let labels = classify_all(classifier, &inputs, &format!("line {line_index}"))?;
                line.words
                    .iter()
                    .zip(labels)
                    .map(|(word, text)| RecognizedWord {
                        region: word.region,
                        text,
                    })
                    .collect()
            }
            RecognitionMode::Characters { size } => line
                .words
                .iter()
                .enumerate()
                .map(|(word_index, word)| {
                    let context = format!("line {line_index} word {word_index}");
                    recognize_characters(raster, word, classifier, size, &context)
                })
                .collect::<SegmentationResult<Vec<_>>>()?,
        };
        lines.push(RecognizedLine {
            region: line.region,
            words,
        });
    }

    let recognized = RecognizedPage { lines };
    debug!(words = recognized.word_count(), "page recognized");
    Ok(recognized)
}

fn recognize_characters<C: Classifier + ?Sized>(
    raster: &DynamicImage,
    word: &Word,
    classifier: &C,
    size: u32,
    context: &str,
) -> SegmentationResult<RecognizedWord> {
    let characters = word.characters.as_deref().ok_or_else(|| {
        SegmentationError::invalid_input(format!("{context} has no character segmentation"))
    })?;
    let inputs = characters
        .iter()
        .map(|character| {
            let crop = crop_region(raster, &character.region)?;
            Ok(ClassifierInput {
                region: character.region,
                pixels: prepare_character_input(&crop, size)?,
            })
        })
        .collect::<SegmentationResult<Vec<_>>>()?;
    let labels = classify_all(classifier, &inputs, context)?;
    Ok(RecognizedWord {
        region: word.region,
        text: labels.concat(),
    })
}

fn classify_all<C: Classifier + ?Sized>(
    classifier: &C,
    inputs: &[ClassifierInput],
    context: &str,
) -> SegmentationResult<Vec<String>> {
    if inputs.is_empty() {
        return Ok(Vec::new());
    }
    let labels = classifier
        .classify_batch(inputs)
        .map_err(|err| SegmentationError::classification(context, err))?;
    if labels.len() != inputs.len() {
        return Err(SegmentationError::invalid_input(format!(
            "classifier returned {} labels for {} inputs ({context})",
            labels.len(),
            inputs.len()
        )));
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Character, Line};
    use image::RgbImage;

    /// Labels every input with the column of its region.
    struct PositionClassifier;

    impl Classifier for PositionClassifier {
        fn classify(&self, input: &ClassifierInput) -> Result<String, BoxError> {
            Ok(format!("x{}", input.region.x_min))
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn classify(&self, _input: &ClassifierInput) -> Result<String, BoxError> {
            Err("model unavailable".into())
        }
    }

    struct ShortBatchClassifier;

    impl Classifier for ShortBatchClassifier {
        fn classify(&self, _input: &ClassifierInput) -> Result<String, BoxError> {
            Ok(String::new())
        }

        fn classify_batch(&self, _inputs: &[ClassifierInput]) -> Result<Vec<String>, BoxError> {
            Ok(vec!["only".to_string()])
        }
    }

    fn sample_page(with_characters: bool) -> PageSegmentation {
        let mut first = Word::new(Region::new(10, 10, 39, 29, 500.0));
        let mut second = Word::new(Region::new(50, 10, 79, 29, 500.0));
        if with_characters {
            first.characters = Some(vec![
                Character {
                    region: Region::new(10, 10, 19, 29, 150.0),
                },
                Character {
                    region: Region::new(25, 10, 34, 29, 150.0),
                },
            ]);
            second.characters = Some(vec![]);
        }
        let mut page = PageSegmentation::empty(100, 50, 1.0);
        page.lines.push(Line {
            region: Region::new(5, 8, 85, 31, 1800.0),
            words: vec![first, second],
        });
        page
    }

    fn blank_raster() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 50, image::Rgb([255, 255, 255])))
    }

    #[test]
    fn test_character_input_shape_and_range() {
        let crop = DynamicImage::ImageLuma8(GrayImage::from_pixel(9, 21, Luma([0])));
        let input = prepare_character_input(&crop, 64).unwrap();
        assert_eq!(input.dim(), (64, 64));
        assert!(input.iter().all(|&v| v == 0.0));
        assert!(prepare_character_input(&crop, 0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_sequence_input_is_padded_and_rotated() {
        let crop = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 5, Luma([0])));
        let input = prepare_sequence_input(&crop, SequenceInputConfig::default()).unwrap();
        assert_eq!(input.dim(), (256, 64));
        // Canvas (0, 0) lands at row 0, last column after a clockwise turn.
        assert_eq!(input[(0, 63)], 0.0);
        assert_eq!(input[(0, 0)], 1.0);
        assert_eq!(input[(200, 63)], 1.0);
    }

    #[test]
    fn test_sequence_input_truncates_large_crops() {
        let crop = DynamicImage::ImageLuma8(GrayImage::from_pixel(400, 100, Luma([0])));
        let input = prepare_sequence_input(&crop, SequenceInputConfig::default()).unwrap();
        assert_eq!(input.dim(), (256, 64));
        assert!(input.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_recognize_words() {
        let page = sample_page(false);
        let mode = RecognitionMode::words();
        let recognized = recognize_page(&blank_raster(), &page, &PositionClassifier, mode).unwrap();
        assert_eq!(recognized.text(), "x10 x50");
    }

    #[test]
    fn test_recognize_characters() {
        let page = sample_page(true);
        let mode = RecognitionMode::characters(32);
        let recognized = recognize_page(&blank_raster(), &page, &PositionClassifier, mode).unwrap();
        assert_eq!(recognized.lines[0].words[0].text, "x10x25");
        assert_eq!(recognized.lines[0].words[1].text, "");
    }

    #[test]
    fn test_character_mode_requires_character_pass() {
        let page = sample_page(false);
        let mode = RecognitionMode::characters(32);
        let err = recognize_page(&blank_raster(), &page, &PositionClassifier, mode).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_dimension_mismatch() {
        let page = sample_page(false);
        let raster = DynamicImage::ImageRgb8(RgbImage::new(200, 50));
        let mode = RecognitionMode::words();
        let err = recognize_page(&raster, &page, &PositionClassifier, mode).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_classifier_failures() {
        let page = sample_page(false);
        let mode = RecognitionMode::words();
        let err = recognize_page(&blank_raster(), &page, &FailingClassifier, mode).unwrap_err();
        assert!(matches!(err, SegmentationError::Classification { .. }));

        let err = recognize_page(&blank_raster(), &page, &ShortBatchClassifier, mode).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
