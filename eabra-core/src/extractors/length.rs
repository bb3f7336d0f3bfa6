//! Length-based features
//!
//! Sentence length in words and word length in letters, lemma letters and
//! syllables.

use std::sync::Arc;

use crate::aggregate::{aggregate_counts, feature_names};
use crate::document::AnnotatedDocument;
use crate::error::Result;
use crate::extractors::FeatureExtractor;
use crate::facilities::SyllableCounter;
use crate::record::FeatureRecord;

pub(crate) const NAME: &str = "length";

/// Non-punctuation tokens per sentence.
pub const SENTENCE_WORDS: &str = "LENsntWRD";
/// Characters per word.
pub const WORD_LETTERS: &str = "LENwrdLETTERS";
/// Characters per lemma.
pub const WORD_STEM: &str = "LENwrdSTEM";
/// Syllables per word.
pub const WORD_SYLLABLES: &str = "LENwrdSYL";

const TAGS: [&str; 4] = [SENTENCE_WORDS, WORD_LETTERS, WORD_STEM, WORD_SYLLABLES];

pub struct LengthExtractor {
    syllables: Arc<dyn SyllableCounter>,
}

impl LengthExtractor {
    pub fn new(syllables: Arc<dyn SyllableCounter>) -> Self {
        LengthExtractor { syllables }
    }
}

impl FeatureExtractor for LengthExtractor {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Sentence length in words; word length in letters, lemma letters and syllables"
    }

    fn feature_names(&self) -> Vec<String> {
        TAGS.iter().flat_map(|tag| feature_names(tag)).collect()
    }

    fn extract(&self, doc: &AnnotatedDocument) -> Result<FeatureRecord> {
        // Whitespace tokens still count towards sentence length; only
        // punctuation is left out.
        let sentence_lengths: Vec<usize> = doc
            .sentences()
            .map(|sentence| sentence.tokens().iter().filter(|t| !t.is_punct()).count())
            .collect();

        let mut letters = Vec::new();
        let mut stems = Vec::new();
        let mut syllables = Vec::new();
        for token in doc.tokens().iter().filter(|t| t.is_word()) {
            letters.push(token.text().chars().count());
            stems.push(token.lemma().chars().count());
            syllables.push(self.syllables.count(&token.text().to_lowercase()));
        }

        let mut features = aggregate_counts(SENTENCE_WORDS, &sentence_lengths);
        for (tag, values) in [
            (WORD_LETTERS, &letters),
            (WORD_STEM, &stems),
            (WORD_SYLLABLES, &syllables),
        ] {
            features.extend(aggregate_counts(tag, values));
        }
        Ok(features)
    }
}
