//! Annotated documents
//!
//! The structure every extractor family reads: sentences of tokens, each token
//! carrying its surface text, lemma, coarse part of speech, dependency label
//! and its place in the sentence's dependency tree.
//!
//! Documents are built from flat [`TokenSpec`]s plus sentence ranges, the same
//! shape annotation toolkits emit (each token points at its head, the root
//! points at itself). Construction validates the shape once, so the trees the
//! extractors walk are always finite and acyclic.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{P}+$").expect("punctuation pattern is valid"));

/// Universal part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
    Space,
}

impl PartOfSpeech {
    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Intj => "INTJ",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Propn => "PROPN",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Sym => "SYM",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::X => "X",
            PartOfSpeech::Space => "SPACE",
        }
    }

    /// Parse a tag, mapping anything unrecognised (including the empty tag
    /// untagged pipelines emit) to `X`.
    pub fn parse_lenient(tag: &str) -> Self {
        tag.parse().unwrap_or(PartOfSpeech::X)
    }
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pos = match s.to_ascii_uppercase().as_str() {
            "ADJ" => PartOfSpeech::Adj,
            "ADP" => PartOfSpeech::Adp,
            "ADV" => PartOfSpeech::Adv,
            "AUX" => PartOfSpeech::Aux,
            "CCONJ" | "CONJ" => PartOfSpeech::Cconj,
            "DET" => PartOfSpeech::Det,
            "INTJ" => PartOfSpeech::Intj,
            "NOUN" => PartOfSpeech::Noun,
            "NUM" => PartOfSpeech::Num,
            "PART" => PartOfSpeech::Part,
            "PRON" => PartOfSpeech::Pron,
            "PROPN" => PartOfSpeech::Propn,
            "PUNCT" => PartOfSpeech::Punct,
            "SCONJ" => PartOfSpeech::Sconj,
            "SYM" => PartOfSpeech::Sym,
            "VERB" => PartOfSpeech::Verb,
            "X" => PartOfSpeech::X,
            "SPACE" => PartOfSpeech::Space,
            other => return Err(format!("unknown part-of-speech tag '{}'", other)),
        };
        Ok(pos)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat token description handed to [`AnnotatedDocument::new`].
///
/// `head` is a document-level token index; the sentence root is its own head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSpec {
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub dep: String,
    pub head: usize,
}

impl TokenSpec {
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: PartOfSpeech,
        dep: impl Into<String>,
        head: usize,
    ) -> Self {
        TokenSpec {
            text: text.into(),
            lemma: lemma.into(),
            pos,
            dep: dep.into(),
            head,
        }
    }
}

/// A validated token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    text: String,
    lemma: String,
    pos: PartOfSpeech,
    dep: String,
    head: usize,
    children: Vec<usize>,
    is_punct: bool,
    is_space: bool,
}

impl Token {
    fn from_spec(spec: TokenSpec) -> Self {
        let is_punct = PUNCTUATION.is_match(&spec.text);
        let is_space = !spec.text.is_empty() && spec.text.chars().all(char::is_whitespace);
        Token {
            dep: spec.dep.to_lowercase(),
            text: spec.text,
            lemma: spec.lemma,
            pos: spec.pos,
            head: spec.head,
            children: Vec::new(),
            is_punct,
            is_space,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn pos(&self) -> PartOfSpeech {
        self.pos
    }

    /// Lower-cased dependency relation label.
    pub fn dep(&self) -> &str {
        &self.dep
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// Document-level indices of this token's syntactic children.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn is_punct(&self) -> bool {
        self.is_punct
    }

    pub fn is_space(&self) -> bool {
        self.is_space
    }

    /// Tokens that count as words: neither punctuation nor whitespace.
    pub fn is_word(&self) -> bool {
        !self.is_punct && !self.is_space
    }
}

/// Token range of one sentence plus the index of its root.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SentenceSpan {
    range: Range<usize>,
    root: usize,
}

/// A document whose dependency trees are known to be well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedDocument {
    tokens: Vec<Token>,
    sentences: Vec<SentenceSpan>,
}

impl AnnotatedDocument {
    /// Validate and assemble a document.
    ///
    /// `sentences` must be non-empty, ordered, contiguous token ranges that
    /// together cover every token. Within a sentence every head must stay inside
    /// the sentence and exactly one token may be its own head.
    pub fn new(
        tokens: Vec<TokenSpec>,
        sentences: Vec<Range<usize>>,
    ) -> Result<Self, DocumentError> {
        let len = tokens.len();
        let mut expected_start = 0;
        for (index, range) in sentences.iter().enumerate() {
            if range.end > len || range.start >= range.end {
                return Err(DocumentError::SentenceOutOfBounds {
                    sentence: index,
                    start: range.start,
                    end: range.end,
                    len,
                });
            }
            if range.start < expected_start {
                return Err(DocumentError::SentenceOverlap { sentence: index });
            }
            if range.start > expected_start {
                return Err(DocumentError::UncoveredToken {
                    token: expected_start,
                });
            }
            expected_start = range.end;
        }
        if expected_start < len {
            return Err(DocumentError::UncoveredToken {
                token: expected_start,
            });
        }

        let mut tokens: Vec<Token> = tokens.into_iter().map(Token::from_spec).collect();
        let mut spans = Vec::with_capacity(sentences.len());
        for (index, range) in sentences.into_iter().enumerate() {
            let root = validate_sentence(&tokens, index, &range)?;
            spans.push(SentenceSpan { range, root });
        }

        for i in 0..tokens.len() {
            let head = tokens[i].head;
            if head != i {
                tokens[head].children.push(i);
            }
        }

        Ok(AnnotatedDocument {
            tokens,
            sentences: spans,
        })
    }

    /// A document with no tokens and no sentences.
    pub fn empty() -> Self {
        AnnotatedDocument {
            tokens: Vec::new(),
            sentences: Vec::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn sentences(&self) -> impl Iterator<Item = Sentence<'_>> {
        self.sentences.iter().map(move |span| Sentence { doc: self, span })
    }

    /// Depth of the dependency subtree rooted at `index`: a leaf is 1, every
    /// other node is one more than its deepest child.
    pub fn subtree_depth(&self, index: usize) -> usize {
        1 + self.tokens[index]
            .children
            .iter()
            .map(|child| self.subtree_depth(*child))
            .max()
            .unwrap_or(0)
    }
}

/// Borrowed view of one sentence.
#[derive(Debug, Clone, Copy)]
pub struct Sentence<'a> {
    doc: &'a AnnotatedDocument,
    span: &'a SentenceSpan,
}

impl<'a> Sentence<'a> {
    pub fn tokens(&self) -> &'a [Token] {
        &self.doc.tokens[self.span.range.clone()]
    }

    pub fn range(&self) -> Range<usize> {
        self.span.range.clone()
    }

    pub fn root_index(&self) -> usize {
        self.span.root
    }

    pub fn root(&self) -> &'a Token {
        &self.doc.tokens[self.span.root]
    }

    /// Depth of the sentence's dependency tree, counting the root as 1.
    pub fn depth(&self) -> usize {
        self.doc.subtree_depth(self.span.root)
    }
}

/// Check heads, root count and acyclicity for one sentence; return its root.
fn validate_sentence(
    tokens: &[Token],
    sentence: usize,
    range: &Range<usize>,
) -> Result<usize, DocumentError> {
    let mut roots = Vec::new();
    for i in range.clone() {
        let head = tokens[i].head;
        if !range.contains(&head) {
            return Err(DocumentError::HeadOutsideSentence {
                token: i,
                head,
                start: range.start,
                end: range.end,
            });
        }
        if head == i {
            roots.push(i);
        }
    }
    if roots.len() != 1 {
        return Err(DocumentError::RootCount {
            sentence,
            roots: roots.len(),
        });
    }
    let root = roots[0];

    // Every token must reach the root in fewer steps than the sentence has tokens.
    let limit = range.len();
    for i in range.clone() {
        let mut current = i;
        let mut steps = 0;
        while current != root {
            current = tokens[current].head;
            steps += 1;
            if steps > limit {
                return Err(DocumentError::Cycle { token: i });
            }
        }
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(text: &str, pos: PartOfSpeech, dep: &str, head: usize) -> TokenSpec {
        TokenSpec::new(text, text.to_lowercase(), pos, dep, head)
    }

    #[test]
    fn test_builds_children_from_heads() {
        // "Dogs bark loudly ."
        let doc = AnnotatedDocument::new(
            vec![
                spec("Dogs", PartOfSpeech::Noun, "nsubj", 1),
                spec("bark", PartOfSpeech::Verb, "ROOT", 1),
                spec("loudly", PartOfSpeech::Adv, "advmod", 1),
                spec(".", PartOfSpeech::Punct, "punct", 1),
            ],
            vec![0..4],
        )
        .unwrap();
        assert_eq!(doc.token(1).children(), &[0, 2, 3]);
        assert_eq!(doc.token(1).dep(), "root");
        assert!(doc.token(3).is_punct());
        assert!(!doc.token(0).is_punct());
        let sentence = doc.sentences().next().unwrap();
        assert_eq!(sentence.root().text(), "bark");
        assert_eq!(sentence.depth(), 2);
    }

    #[test]
    fn test_depth_counts_root_as_one() {
        // R has children A (leaf) and B, B has child C (leaf): depth 3.
        let doc = AnnotatedDocument::new(
            vec![
                spec("A", PartOfSpeech::Noun, "dep", 1),
                spec("R", PartOfSpeech::Verb, "ROOT", 1),
                spec("B", PartOfSpeech::Noun, "dep", 1),
                spec("C", PartOfSpeech::Noun, "dep", 2),
            ],
            vec![0..4],
        )
        .unwrap();
        assert_eq!(doc.sentences().next().unwrap().depth(), 3);
        assert_eq!(doc.subtree_depth(0), 1);
    }

    #[test]
    fn test_single_token_sentence_has_depth_one() {
        let doc = AnnotatedDocument::new(
            vec![spec("Hi", PartOfSpeech::Intj, "ROOT", 0)],
            vec![0..1],
        )
        .unwrap();
        assert_eq!(doc.sentences().next().unwrap().depth(), 1);
    }

    #[test]
    fn test_rejects_cycle() {
        let err = AnnotatedDocument::new(
            vec![
                spec("a", PartOfSpeech::X, "dep", 1),
                spec("b", PartOfSpeech::X, "dep", 0),
                spec("c", PartOfSpeech::X, "ROOT", 2),
            ],
            vec![0..3],
        )
        .unwrap_err();
        assert_eq!(err, DocumentError::Cycle { token: 0 });
    }

    #[test]
    fn test_rejects_head_outside_sentence() {
        let err = AnnotatedDocument::new(
            vec![
                spec("a", PartOfSpeech::X, "ROOT", 0),
                spec("b", PartOfSpeech::X, "dep", 0),
            ],
            vec![0..1, 1..2],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::HeadOutsideSentence { token: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_missing_root_and_gaps() {
        let no_root = AnnotatedDocument::new(
            vec![
                spec("a", PartOfSpeech::X, "dep", 1),
                spec("b", PartOfSpeech::X, "dep", 0),
            ],
            vec![0..2],
        )
        .unwrap_err();
        assert_eq!(
            no_root,
            DocumentError::RootCount {
                sentence: 0,
                roots: 0
            }
        );

        let uncovered =
            AnnotatedDocument::new(vec![spec("a", PartOfSpeech::X, "ROOT", 0)], vec![])
                .unwrap_err();
        assert_eq!(uncovered, DocumentError::UncoveredToken { token: 0 });
    }

    #[test]
    fn test_space_and_punct_flags() {
        let doc = AnnotatedDocument::new(
            vec![
                spec("Hi", PartOfSpeech::Intj, "ROOT", 0),
                spec("\n\n", PartOfSpeech::Space, "dep", 0),
                spec("...", PartOfSpeech::Punct, "punct", 0),
                spec("$", PartOfSpeech::Sym, "dep", 0),
            ],
            vec![0..4],
        )
        .unwrap();
        assert!(doc.token(1).is_space());
        assert!(!doc.token(1).is_word());
        assert!(doc.token(2).is_punct());
        assert!(doc.token(3).is_word());
    }

    #[test]
    fn test_pos_parsing() {
        assert_eq!("noun".parse::<PartOfSpeech>(), Ok(PartOfSpeech::Noun));
        assert_eq!(PartOfSpeech::parse_lenient(""), PartOfSpeech::X);
        assert_eq!(PartOfSpeech::Propn.to_string(), "PROPN");
    }
}
