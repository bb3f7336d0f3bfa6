//! Test helpers
//!
//! [`DocBuilder`] assembles annotated documents by hand, sentence by sentence,
//! with heads given relative to the sentence being built. It panics on invalid
//! trees; it is meant for tests and examples only.

use std::ops::Range;

use crate::document::{AnnotatedDocument, PartOfSpeech, TokenSpec};

#[derive(Debug, Default)]
pub struct DocBuilder {
    tokens: Vec<TokenSpec>,
    sentences: Vec<Range<usize>>,
    sentence_start: usize,
}

impl DocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token whose lemma is its lower-cased text. `head` is the index of
    /// the head within the current sentence; the root points at itself.
    pub fn token(self, text: &str, pos: PartOfSpeech, dep: &str, head: usize) -> Self {
        let lemma = text.to_lowercase();
        self.token_with_lemma(text, &lemma, pos, dep, head)
    }

    pub fn token_with_lemma(
        mut self,
        text: &str,
        lemma: &str,
        pos: PartOfSpeech,
        dep: &str,
        head: usize,
    ) -> Self {
        let head = self.sentence_start + head;
        self.tokens.push(TokenSpec::new(text, lemma, pos, dep, head));
        self
    }

    /// Close the current sentence.
    pub fn end_sentence(mut self) -> Self {
        if self.tokens.len() > self.sentence_start {
            self.sentences.push(self.sentence_start..self.tokens.len());
            self.sentence_start = self.tokens.len();
        }
        self
    }

    pub fn build(self) -> AnnotatedDocument {
        let builder = self.end_sentence();
        AnnotatedDocument::new(builder.tokens, builder.sentences)
            .expect("test document should be well formed")
    }
}

/// "The cat sat on the mat." followed by "It slept."
pub fn cat_document() -> AnnotatedDocument {
    use PartOfSpeech::*;
    DocBuilder::new()
        .token("The", Det, "det", 1)
        .token("cat", Noun, "nsubj", 2)
        .token_with_lemma("sat", "sit", Verb, "ROOT", 2)
        .token("on", Adp, "prep", 2)
        .token("the", Det, "det", 5)
        .token("mat", Noun, "pobj", 3)
        .token(".", Punct, "punct", 2)
        .end_sentence()
        .token("It", Pron, "nsubj", 1)
        .token_with_lemma("slept", "sleep", Verb, "ROOT", 1)
        .token(".", Punct, "punct", 1)
        .build()
}
