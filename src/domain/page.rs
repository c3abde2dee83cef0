//! The segmentation result hierarchy: lines, words, characters and diagrams.

use serde::{Deserialize, Serialize};

use super::region::{Bounded, Region};

/// A single character inside a word, in page-absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub region: Region,
}

/// A word inside a text line, in page-absolute coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub region: Region,
    /// Characters ordered left to right.
    ///
    /// `None` when the character pass was not requested; `Some(vec![])` when it
    /// ran and found nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<Character>>,
}

impl Word {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            characters: None,
        }
    }

    /// Characters of this word, or an empty slice if the character pass did not run.
    pub fn characters(&self) -> &[Character] {
        self.characters.as_deref().unwrap_or(&[])
    }
}

/// A text line and the words found inside it, ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub region: Region,
    pub words: Vec<Word>,
}

/// A non-text region found by the edge-based diagram pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub region: Region,
}

macro_rules! impl_bounded {
    ($($ty:ty),*) => {
        $(
            impl Bounded for $ty {
                fn region(&self) -> &Region {
                    &self.region
                }
            }
        )*
    };
}

impl_bounded!(Character, Word, Line, Diagram);

/// The complete segmentation of one page.
///
/// Coordinates refer to the normalized raster the pipeline worked on, whose
/// size is `width x height`. `scale` is the ratio between the normalized and
/// the submitted raster width (1.0 when no downscaling happened); use
/// [`PageSegmentation::to_source_coordinates`] to map results back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSegmentation {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    /// Lines ordered top to bottom.
    pub lines: Vec<Line>,
    /// Diagrams in discovery order; they have no relation to `lines`.
    pub diagrams: Vec<Diagram>,
}

impl PageSegmentation {
    /// An empty result for a `width x height` page.
    pub fn empty(width: u32, height: u32, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
            lines: Vec::new(),
            diagrams: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.diagrams.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| line.words.len()).sum()
    }

    pub fn character_count(&self) -> usize {
        self.words().map(|word| word.characters().len()).sum()
    }

    /// All words in reading order (line by line, left to right).
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    /// Maps every region back onto the raster that was originally submitted.
    ///
    /// # Arguments
    ///
    /// * `source_width` - Width of the submitted raster.
    /// * `source_height` - Height of the submitted raster.
    pub fn to_source_coordinates(&self, source_width: u32, source_height: u32) -> Self {
        if self.width == source_width && self.height == source_height {
            return self.clone();
        }

        let factor = f64::from(source_width) / f64::from(self.width.max(1));
        let map = |region: &Region| region.scale(factor, source_width, source_height);

        Self {
            width: source_width,
            height: source_height,
            scale: 1.0,
            lines: self
                .lines
                .iter()
                .map(|line| Line {
                    region: map(&line.region),
                    words: line
                        .words
                        .iter()
                        .map(|word| Word {
                            region: map(&word.region),
                            characters: word.characters.as_ref().map(|chars| {
                                chars
                                    .iter()
                                    .map(|c| Character {
                                        region: map(&c.region),
                                    })
                                    .collect()
                            }),
                        })
                        .collect(),
                })
                .collect(),
            diagrams: self
                .diagrams
                .iter()
                .map(|d| Diagram {
                    region: map(&d.region),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> PageSegmentation {
        let mut word = Word::new(Region::new(10, 10, 49, 29, 600.0));
        word.characters = Some(vec![Character {
            region: Region::new(12, 11, 20, 28, 0.0),
        }]);
        PageSegmentation {
            width: 500,
            height: 250,
            scale: 0.5,
            lines: vec![Line {
                region: Region::new(5, 8, 200, 31, 0.0),
                words: vec![word, Word::new(Region::new(60, 10, 99, 29, 500.0))],
            }],
            diagrams: vec![Diagram {
                region: Region::new(300, 100, 399, 199, 0.0),
            }],
        }
    }

    #[test]
    fn test_counts() {
        let page = sample_page();
        assert_eq!(page.line_count(), 1);
        assert_eq!(page.word_count(), 2);
        assert_eq!(page.character_count(), 1);
        assert!(!page.is_empty());
        assert!(PageSegmentation::empty(10, 10, 1.0).is_empty());
    }

    #[test]
    fn test_to_source_coordinates_doubles_regions() {
        let page = sample_page().to_source_coordinates(1000, 500);
        assert_eq!(page.width, 1000);
        assert_eq!(page.scale, 1.0);
        let word = &page.lines[0].words[0];
        assert_eq!(word.region.x_min, 20);
        assert_eq!(word.region.x_max, 99);
        assert_eq!(word.characters()[0].region.x_min, 24);
        assert_eq!(page.diagrams[0].region.y_max, 399);
        assert!(page.lines[0].words[1].characters.is_none());
    }

    #[test]
    fn test_to_source_coordinates_identity() {
        let page = sample_page();
        assert_eq!(page.to_source_coordinates(500, 250), page);
    }

    #[test]
    fn test_serde_skips_missing_characters() {
        let word = Word::new(Region::new(0, 0, 3, 3, 16.0));
        let json = serde_json::to_string(&word).unwrap();
        assert!(!json.contains("characters"));
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);
    }
}
