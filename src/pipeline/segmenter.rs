//! The page segmenter: line, word, character and diagram passes.
//!
//! One invocation is a linear sequence over a single page:
//!
//! 1. **Normalize** the raster to at most `max_width` columns.
//! 2. **Line pass**: fixed-threshold ink mask, dilated with the line kernel,
//!    outer contours ordered top to bottom.
//! 3. **Word pass**: the ink mask dilated once with the word kernel is cropped
//!    to every line; contours are area-filtered, ordered left to right and
//!    translated back into page coordinates.
//! 4. **Character pass** (optional): each word is cropped from the color
//!    raster, binarized on its own, and its contours are size-filtered and
//!    ordered left to right.
//! 5. **Diagram pass**: Canny edges over the whole page, contours filtered by
//!    bounding-box size.
//!
//! Steps 3 and 4 fan out over lines and words according to the
//! [`ParallelPolicy`](crate::core::config::ParallelPolicy). Every list is
//! sorted after collection, so the result does not depend on scheduling.

use image::{DynamicImage, GrayImage};
use rayon::prelude::*;
use tracing::{debug, debug_span, trace};

use super::config::SegmentationConfig;
use crate::core::config::ConfigValidator as _;
use crate::core::errors::{SegmentationError, SegmentationResult};
use crate::domain::{Character, Diagram, Line, PageSegmentation, RecognizedPage, Region, Word};
use crate::processors::{
    BinaryMask, NormalizedRaster, SortAxis, binarize_gray, binarize_with, detect_edges, dilate,
    extract_contours, filter_by_area, filter_by_size, normalize_width, ordered, to_intensity,
};
use crate::recognition::{Classifier, RecognitionMode, recognize_page};
use crate::utils::crop_region;

/// Segments pages with one validated configuration.
///
/// Construction validates the configuration and, when
/// `parallel.max_threads` is set, builds a dedicated thread pool that every
/// invocation runs in. The segmenter holds no per-page state and can be
/// shared across threads.
#[derive(Debug)]
pub struct PageSegmenter {
    config: SegmentationConfig,
    pool: Option<rayon::ThreadPool>,
}

impl PageSegmenter {
    /// Creates a segmenter after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `SegmentationError::Config` if the configuration is invalid or
    /// the thread pool cannot be built.
    pub fn new(config: SegmentationConfig) -> SegmentationResult<Self> {
        config.validate()?;

        let pool = config
            .parallel
            .max_threads
            .map(|threads| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("inkseg-{i}"))
                    .build()
                    .map_err(|err| {
                        SegmentationError::config_error(format!(
                            "failed to build a pool of {threads} threads: {err}"
                        ))
                    })
            })
            .transpose()?;

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Character recognition at the configured `char_size`.
    pub fn character_mode(&self) -> RecognitionMode {
        RecognitionMode::characters(self.config.char_size)
    }

    /// Caps the raster width at `max_width`; see [`normalize_width`].
    pub fn normalize<'a>(
        &self,
        raster: &'a DynamicImage,
    ) -> SegmentationResult<NormalizedRaster<'a>> {
        normalize_width(raster, self.config.max_width)
    }

    /// Segments one page into lines, words, optional characters and diagrams.
    ///
    /// Coordinates in the result refer to the normalized raster; see
    /// [`PageSegmentation::to_source_coordinates`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero-width or zero-height raster.
    pub fn segment_page(&self, raster: &DynamicImage) -> SegmentationResult<PageSegmentation> {
        let with_characters = self.config.do_character_pass;
        self.run(|| {
            let normalized = self.normalize(raster)?;
            self.segment_normalized(&normalized, with_characters)
        })
    }

    /// Runs only the diagram pass over the normalized page.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero-width or zero-height raster.
    pub fn extract_diagrams(&self, raster: &DynamicImage) -> SegmentationResult<Vec<Diagram>> {
        self.run(|| {
            let normalized = self.normalize(raster)?;
            let gray = to_intensity(&normalized.image);
            Ok(self.diagram_pass(&gray))
        })
    }

    /// Segments a page and hands every word (or character) crop to `classifier`.
    ///
    /// In character mode the character pass runs regardless of
    /// `do_character_pass`. Both results are in normalized coordinates.
    ///
    /// # Errors
    ///
    /// Fails like [`segment_page`](Self::segment_page), and with
    /// `SegmentationError::Classification` when the classifier fails.
    pub fn segment_and_recognize<C: Classifier + ?Sized>(
        &self,
        raster: &DynamicImage,
        classifier: &C,
        mode: RecognitionMode,
    ) -> SegmentationResult<(PageSegmentation, RecognizedPage)> {
        let with_characters =
            self.config.do_character_pass || matches!(mode, RecognitionMode::Characters { .. });
        self.run(|| {
            let normalized = self.normalize(raster)?;
            let page = self.segment_normalized(&normalized, with_characters)?;
            let recognized = recognize_page(&normalized.image, &page, classifier, mode)?;
            Ok((page, recognized))
        })
    }

    fn run<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    fn segment_normalized(
        &self,
        normalized: &NormalizedRaster<'_>,
        with_characters: bool,
    ) -> SegmentationResult<PageSegmentation> {
        let image: &DynamicImage = &normalized.image;
        let (width, height) = (image.width(), image.height());
        let _span = debug_span!("segment_page", width, height).entered();
        if normalized.was_resized() {
            debug!(scale = normalized.scale, "page downscaled to {width}x{height}");
        }

        let gray = to_intensity(image);
        let ink = binarize_gray(&gray, self.config.threshold);

        let line_regions = self.line_pass(&ink)?;
        let word_mask = dilate(&ink, self.config.word_kernel)?;
        drop(ink);

        let parallel = self.config.parallel.parallel_lines(line_regions.len());
        let mut lines = map_ordered(&line_regions, parallel, |index, region| {
            let _span = debug_span!("word_pass", line = index).entered();
            let words = self.words_in_line(&word_mask, region)?;
            Ok(Line {
                region: *region,
                words,
            })
        })?;
        debug!(
            words = lines.iter().map(|line| line.words.len()).sum::<usize>(),
            "word pass done"
        );

        if with_characters {
            for (index, line) in lines.iter_mut().enumerate() {
                let _span = debug_span!("character_pass", line = index).entered();
                self.characters_in_line(image, line)?;
            }
        }

        let diagrams = self.diagram_pass(&gray);

        let page = PageSegmentation {
            width,
            height,
            scale: normalized.scale,
            lines,
            diagrams,
        };
        if page.is_empty() {
            trace!("no lines or diagrams found");
        }
        Ok(page)
    }

    fn line_pass(&self, ink: &BinaryMask) -> SegmentationResult<Vec<Region>> {
        let _span = debug_span!("line_pass").entered();
        let line_mask = dilate(ink, self.config.line_kernel)?;
        let lines = ordered(extract_contours(&line_mask), SortAxis::Vertical);
        debug!(lines = lines.len(), "line pass done");
        Ok(lines)
    }

    fn words_in_line(
        &self,
        word_mask: &BinaryMask,
        line: &Region,
    ) -> SegmentationResult<Vec<Word>> {
        let crop = word_mask.crop(line)?;
        let regions = filter_by_area(extract_contours(&crop), self.config.min_word_area);
        let words: Vec<Word> = ordered(regions, SortAxis::Horizontal)
            .into_iter()
            .map(|region| Word::new(region.translate(line.x_min, line.y_min)))
            .collect();
        if words.is_empty() {
            trace!("line {:?} has no words", line.as_xywh());
        }
        Ok(words)
    }

    fn characters_in_line(&self, image: &DynamicImage, line: &mut Line) -> SegmentationResult<()> {
        let parallel = self.config.parallel.parallel_words(line.words.len());
        let characters = map_ordered(&line.words, parallel, |_, word| {
            self.characters_in_word(image, &word.region)
        })?;
        let count: usize = characters.iter().map(Vec::len).sum();
        for (word, found) in line.words.iter_mut().zip(characters) {
            word.characters = Some(found);
        }
        debug!(characters = count, "character pass done");
        Ok(())
    }

    fn characters_in_word(
        &self,
        image: &DynamicImage,
        word: &Region,
    ) -> SegmentationResult<Vec<Character>> {
        let crop = crop_region(image, word)?;
        let mask = binarize_with(&crop, self.config.character_threshold)?;
        let regions = filter_by_size(
            extract_contours(&mask),
            self.config.min_char_width,
            self.config.min_char_height,
        );
        Ok(ordered(regions, SortAxis::Horizontal)
            .into_iter()
            .map(|region| Character {
                region: region.translate(word.x_min, word.y_min),
            })
            .collect())
    }

    fn diagram_pass(&self, gray: &GrayImage) -> Vec<Diagram> {
        let _span = debug_span!("diagram_pass").entered();
        let edges = detect_edges(gray, self.config.canny_low, self.config.canny_high);
        let size = self.config.diagram_min_size;
        let diagrams: Vec<Diagram> = filter_by_size(extract_contours(&edges), size, size)
            .into_iter()
            .map(|region| Diagram { region })
            .collect();
        debug!(diagrams = diagrams.len(), "diagram pass done");
        diagrams
    }
}

/// Maps `f` over `items`, in parallel when asked, keeping input order.
fn map_ordered<T, R, F>(items: &[T], parallel: bool, f: F) -> SegmentationResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> SegmentationResult<R> + Sync + Send,
{
    if parallel {
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| f(index, item))
            .collect()
    } else {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| f(index, item))
            .collect()
    }
}

/// Segments `raster` with `config`.
///
/// Builds a [`PageSegmenter`] for a single call; reuse a segmenter when
/// processing many pages.
///
/// # Errors
///
/// Returns a configuration error for an invalid `config` and `InvalidInput`
/// for an empty raster.
pub fn segment_page(
    raster: &DynamicImage,
    config: &SegmentationConfig,
) -> SegmentationResult<PageSegmentation> {
    PageSegmenter::new(config.clone())?.segment_page(raster)
}

/// Runs only the diagram pass over `raster` with `config`.
///
/// # Errors
///
/// Returns a configuration error for an invalid `config` and `InvalidInput`
/// for an empty raster.
pub fn extract_diagrams(
    raster: &DynamicImage,
    config: &SegmentationConfig,
) -> SegmentationResult<Vec<Diagram>> {
    PageSegmenter::new(config.clone())?.extract_diagrams(raster)
}
