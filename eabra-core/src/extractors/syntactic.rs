//! Syntactic features
//!
//! Dependency-tree depth per sentence and per-sentence counts of a fixed set
//! of dependency relations.

use crate::aggregate::{aggregate_counts, feature_names};
use crate::document::AnnotatedDocument;
use crate::error::Result;
use crate::extractors::FeatureExtractor;
use crate::record::FeatureRecord;

pub(crate) const NAME: &str = "syntactic";

/// Dependency-tree depth per sentence.
pub const SENTENCE_DEPTH: &str = "SYNdevHGT";

/// Counted relations and their feature prefixes. Other labels are ignored.
pub const RELATIONS: [(&str, &str); 8] = [
    ("nsubj", "SYNdepNSUBJ"),
    ("obj", "SYNdepOBJ"),
    ("amod", "SYNdepAMOD"),
    ("advmod", "SYNdepADVMOD"),
    ("ccomp", "SYNdepCCOMP"),
    ("xcomp", "SYNdepXCOMP"),
    ("aux", "SYNdepAUX"),
    ("punct", "SYNdepPUNCT"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntacticExtractor;

impl SyntacticExtractor {
    pub fn new() -> Self {
        SyntacticExtractor
    }
}

impl FeatureExtractor for SyntacticExtractor {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Dependency tree depth and dependency relation counts per sentence"
    }

    fn feature_names(&self) -> Vec<String> {
        std::iter::once(SENTENCE_DEPTH)
            .chain(RELATIONS.iter().map(|(_, tag)| *tag))
            .flat_map(feature_names)
            .collect()
    }

    fn extract(&self, doc: &AnnotatedDocument) -> Result<FeatureRecord> {
        let mut depths = Vec::with_capacity(doc.sentence_count());
        let mut counts: Vec<Vec<usize>> =
            vec![Vec::with_capacity(doc.sentence_count()); RELATIONS.len()];

        for sentence in doc.sentences() {
            depths.push(sentence.depth());

            let mut per_sentence = [0usize; RELATIONS.len()];
            for token in sentence.tokens() {
                if let Some(slot) = RELATIONS.iter().position(|(label, _)| *label == token.dep()) {
                    per_sentence[slot] += 1;
                }
            }
            for (slot, count) in per_sentence.iter().enumerate() {
                counts[slot].push(*count);
            }
        }

        let mut features = aggregate_counts(SENTENCE_DEPTH, &depths);
        for ((_, tag), values) in RELATIONS.iter().zip(&counts) {
            features.extend(aggregate_counts(tag, values));
        }
        Ok(features)
    }
}
