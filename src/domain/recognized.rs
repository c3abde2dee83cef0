//! Text attached to segmented regions by an external classifier.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::region::{Bounded, Region};

/// A word region and the text the classifier produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub region: Region,
    pub text: String,
}

/// A line region and its recognized words, left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    pub region: Region,
    pub words: Vec<RecognizedWord>,
}

impl RecognizedLine {
    /// Words joined by single spaces.
    pub fn text(&self) -> String {
        self.words.iter().map(|word| word.text.as_str()).join(" ")
    }
}

/// Recognized lines of one page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedPage {
    pub lines: Vec<RecognizedLine>,
}

impl RecognizedPage {
    /// The page text: words joined by spaces, lines by newlines.
    pub fn text(&self) -> String {
        self.lines.iter().map(RecognizedLine::text).join("\n")
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| line.words.len()).sum()
    }
}

impl Bounded for RecognizedWord {
    fn region(&self) -> &Region {
        &self.region
    }
}

impl Bounded for RecognizedLine {
    fn region(&self) -> &Region {
        &self.region
    }
}
