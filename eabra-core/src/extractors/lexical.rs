//! Lexical diversity features
//!
//! Whole-document scalars, so they bypass aggregation. Computed over the
//! lower-cased surface forms and lemmas of every word token.

use std::sync::Arc;

use crate::document::AnnotatedDocument;
use crate::error::Result;
use crate::extractors::FeatureExtractor;
use crate::facilities::LexicalDiversity;
use crate::record::FeatureRecord;

pub(crate) const NAME: &str = "lexical";

/// TTR over lemmas.
pub const LEMMA_TTR: &str = "LEXdvrWLT";
/// MTLD over lemmas.
pub const LEMMA_MTLD: &str = "LEXdvrWLD";
/// Log TTR over lemmas.
pub const LEMMA_LOG_TTR: &str = "LEXdvrWLL";
/// TTR over surface forms.
pub const SURFACE_TTR: &str = "LEXdvrWST";
/// MTLD over surface forms.
pub const SURFACE_MTLD: &str = "LEXdvrWSD";
/// Log TTR over surface forms.
pub const SURFACE_LOG_TTR: &str = "LEXdvrWSL";

const NAMES: [&str; 6] = [
    LEMMA_TTR,
    LEMMA_MTLD,
    LEMMA_LOG_TTR,
    SURFACE_TTR,
    SURFACE_MTLD,
    SURFACE_LOG_TTR,
];

pub struct LexicalExtractor {
    diversity: Arc<dyn LexicalDiversity>,
}

impl LexicalExtractor {
    pub fn new(diversity: Arc<dyn LexicalDiversity>) -> Self {
        LexicalExtractor { diversity }
    }
}

impl FeatureExtractor for LexicalExtractor {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Type-token ratio, MTLD and log TTR over surface forms and lemmas"
    }

    fn feature_names(&self) -> Vec<String> {
        NAMES.iter().map(|name| name.to_string()).collect()
    }

    /// A document without words yields an empty record, not zeros.
    fn extract(&self, doc: &AnnotatedDocument) -> Result<FeatureRecord> {
        let (surface, lemmas): (Vec<String>, Vec<String>) = doc
            .tokens()
            .iter()
            .filter(|t| t.is_word())
            .map(|t| (t.text().to_lowercase(), t.lemma().to_lowercase()))
            .unzip();

        if surface.is_empty() {
            return Ok(FeatureRecord::new());
        }

        let d = &self.diversity;
        let values = [
            d.ttr(&lemmas),
            d.mtld(&lemmas),
            d.log_ttr(&lemmas),
            d.ttr(&surface),
            d.mtld(&surface),
            d.log_ttr(&surface),
        ];
        Ok(NAMES
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facilities::{StandardDiversity, MTLD_UNDEFINED};
    use crate::testing::cat_document;

    fn extractor() -> LexicalExtractor {
        LexicalExtractor::new(Arc::new(StandardDiversity::new()))
    }

    #[test]
    fn test_surface_and_lemma_ratios() {
        let features = extractor().extract(&cat_document()).unwrap();
        assert_eq!(features.len(), 6);
        // the cat sat on the mat it slept: 7 types / 8 tokens
        assert_eq!(features.get(SURFACE_TTR), Some(7.0 / 8.0));
        assert_eq!(features.get(LEMMA_TTR), Some(7.0 / 8.0));
        let log_ttr = features.get(SURFACE_LOG_TTR).unwrap();
        assert!((log_ttr - 7f64.log10() / 8f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_mtld_sentinel_is_propagated() {
        use crate::document::PartOfSpeech::*;
        use crate::testing::DocBuilder;

        let doc = DocBuilder::new()
            .token("Birds", Noun, "nsubj", 1)
            .token("fly", Verb, "ROOT", 1)
            .build();
        let features = extractor().extract(&doc).unwrap();
        assert_eq!(features.get(SURFACE_MTLD), Some(MTLD_UNDEFINED));
        assert_eq!(features.get(LEMMA_MTLD), Some(MTLD_UNDEFINED));
    }

    #[test]
    fn test_no_words_means_no_features() {
        use crate::document::PartOfSpeech::*;
        use crate::testing::DocBuilder;

        let doc = DocBuilder::new().token("!", Punct, "ROOT", 0).build();
        assert!(extractor().extract(&doc).unwrap().is_empty());
        assert!(extractor()
            .extract(&AnnotatedDocument::empty())
            .unwrap()
            .is_empty());
    }
}
