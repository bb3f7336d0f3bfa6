//! Discourse features
//!
//! Referential expressions per sentence: pronouns and definite articles
//! relative to nouns.

use crate::aggregate::{aggregate_feature, feature_names};
use crate::document::{AnnotatedDocument, PartOfSpeech, Token};
use crate::error::Result;
use crate::extractors::FeatureExtractor;
use crate::record::FeatureRecord;

pub(crate) const NAME: &str = "discourse";

/// Pronouns per noun, per sentence.
pub const PRONOUNS_PER_NOUN: &str = "DISrefPN";
/// Definite articles per noun, per sentence.
pub const DEFINITES_PER_NOUN: &str = "DISrefDN";

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscourseExtractor;

impl DiscourseExtractor {
    pub fn new() -> Self {
        DiscourseExtractor
    }
}

fn is_definite_article(token: &Token) -> bool {
    token.pos() == PartOfSpeech::Det && token.text().to_lowercase() == "the"
}

impl FeatureExtractor for DiscourseExtractor {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Pronoun and definite article ratios to nouns per sentence"
    }

    fn feature_names(&self) -> Vec<String> {
        [PRONOUNS_PER_NOUN, DEFINITES_PER_NOUN]
            .into_iter()
            .flat_map(feature_names)
            .collect()
    }

    fn extract(&self, doc: &AnnotatedDocument) -> Result<FeatureRecord> {
        let mut pronoun_ratios = Vec::with_capacity(doc.sentence_count());
        let mut definite_ratios = Vec::with_capacity(doc.sentence_count());

        for sentence in doc.sentences() {
            let tokens = sentence.tokens();
            let nouns = tokens.iter().filter(|t| t.pos() == PartOfSpeech::Noun).count();
            if nouns == 0 {
                pronoun_ratios.push(0.0);
                definite_ratios.push(0.0);
                continue;
            }
            let pronouns = tokens.iter().filter(|t| t.pos() == PartOfSpeech::Pron).count();
            let definites = tokens.iter().filter(|t| is_definite_article(t)).count();
            pronoun_ratios.push(pronouns as f64 / nouns as f64);
            definite_ratios.push(definites as f64 / nouns as f64);
        }

        let mut features = aggregate_feature(PRONOUNS_PER_NOUN, &pronoun_ratios);
        features.extend(aggregate_feature(DEFINITES_PER_NOUN, &definite_ratios));
        Ok(features)
    }
}
