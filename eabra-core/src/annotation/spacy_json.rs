//! spaCy `Doc.to_json()` reader
//!
//! The input text is the JSON spaCy emits for an annotated `Doc`:
//!
//! ```json
//! {
//!   "text": "Dogs bark.",
//!   "sents": [{"start": 0, "end": 10}],
//!   "tokens": [
//!     {"id": 0, "start": 0, "end": 4, "pos": "NOUN", "lemma": "dog", "dep": "nsubj", "head": 1},
//!     {"id": 1, "start": 5, "end": 9, "pos": "VERB", "lemma": "bark", "dep": "ROOT", "head": 1},
//!     {"id": 2, "start": 9, "end": 10, "pos": "PUNCT", "lemma": ".", "dep": "punct", "head": 1}
//!   ]
//! }
//! ```
//!
//! Offsets are character offsets into `text`. Heads are document-level token
//! indices. Without `sents` the whole document is one sentence.

use serde::Deserialize;

use super::Annotator;
use crate::document::{AnnotatedDocument, PartOfSpeech, TokenSpec};
use crate::error::{AnnotationError, DocumentError};

pub(crate) const NAME: &str = "spacy-json";

#[derive(Debug, Deserialize)]
struct SpacyDoc {
    text: String,
    #[serde(default)]
    sents: Vec<SpacySpan>,
    #[serde(default)]
    tokens: Vec<SpacyToken>,
}

#[derive(Debug, Deserialize)]
struct SpacySpan {
    end: usize,
}

#[derive(Debug, Deserialize)]
struct SpacyToken {
    start: usize,
    end: usize,
    #[serde(default)]
    pos: String,
    #[serde(default)]
    lemma: String,
    #[serde(default)]
    dep: String,
    head: usize,
}

/// Reads pre-annotated documents serialised by spaCy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacyJsonAnnotator;

impl SpacyJsonAnnotator {
    pub fn new() -> Self {
        SpacyJsonAnnotator
    }

    fn malformed(source: DocumentError) -> AnnotationError {
        AnnotationError::Malformed {
            annotator: NAME.to_string(),
            source,
        }
    }
}

impl Annotator for SpacyJsonAnnotator {
    fn name(&self) -> &str {
        NAME
    }

    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError> {
        let doc: SpacyDoc = serde_json::from_str(text)?;
        let chars: Vec<char> = doc.text.chars().collect();

        let mut specs = Vec::with_capacity(doc.tokens.len());
        for token in &doc.tokens {
            if token.start > token.end || token.end > chars.len() {
                return Err(Self::malformed(DocumentError::SpanOutOfBounds {
                    start: token.start,
                    end: token.end,
                    len: chars.len(),
                }));
            }
            if token.head >= doc.tokens.len() {
                return Err(AnnotationError::InvalidInput {
                    annotator: NAME.to_string(),
                    reason: format!(
                        "token at {}..{} points at head {} of {} tokens",
                        token.start,
                        token.end,
                        token.head,
                        doc.tokens.len()
                    ),
                });
            }
            let surface: String = chars[token.start..token.end].iter().collect();
            // Pipelines without a lemmatizer leave the lemma empty.
            let lemma = if token.lemma.is_empty() {
                surface.clone()
            } else {
                token.lemma.clone()
            };
            specs.push(TokenSpec::new(
                surface,
                lemma,
                PartOfSpeech::parse_lenient(&token.pos),
                token.dep.clone(),
                token.head,
            ));
        }

        let sentences = if doc.sents.is_empty() {
            if specs.is_empty() {
                Vec::new()
            } else {
                vec![0..specs.len()]
            }
        } else {
            sentence_ranges(&doc.sents, &doc.tokens)
        };

        AnnotatedDocument::new(specs, sentences).map_err(Self::malformed)
    }
}

/// Map character-offset sentences onto token ranges. A token belongs to the
/// first sentence ending after its first character; sentences without tokens
/// vanish.
fn sentence_ranges(sents: &[SpacySpan], tokens: &[SpacyToken]) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::with_capacity(sents.len());
    let mut next = 0;
    for sent in sents {
        let start = next;
        while next < tokens.len() && tokens[next].start < sent.end {
            next += 1;
        }
        if next > start {
            ranges.push(start..next);
        }
    }
    if next < tokens.len() {
        ranges.push(next..tokens.len());
    }
    ranges
}
