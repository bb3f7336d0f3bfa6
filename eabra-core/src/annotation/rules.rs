//! Rule-based annotator
//!
//! Tokenizes with a logos lexer, breaks sentences after terminal punctuation
//! and tags tokens from closed-class word lists. Open-class words are guessed
//! from their left neighbour. The dependency tree is one level deep: the first
//! verb (or first word) is the root and every other token attaches to it.

use logos::Logos;

use super::Annotator;
use crate::document::{AnnotatedDocument, PartOfSpeech, TokenSpec};
use crate::error::AnnotationError;

pub(crate) const NAME: &str = "rules";

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "themselves", "mine", "yours",
    "hers", "ours", "theirs", "who", "whom", "someone", "something", "anyone", "anything",
    "everyone", "everything", "nobody", "nothing",
];

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "my", "your", "his", "its", "our",
    "their", "some", "any", "no", "every", "each", "all", "both", "either", "neither",
];

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];

const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "from", "up", "down", "over",
    "under", "to",
];

const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet", "so"];

const SUBORDINATORS: &[&str] = &[
    "because", "although", "though", "if", "unless", "while", "whereas", "since", "whether",
];

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"[0-9]+([.,][0-9]+)*")]
    Number,

    #[regex(r"[\p{L}\p{M}]+(['’][\p{L}\p{M}]+)*")]
    Word,

    // Sentence terminators, runs kept together ("?!", "...")
    #[regex(r"[.!?]+")]
    Terminal,

    #[regex(r"[^\s\p{L}\p{M}\p{N}.!?]")]
    Symbol,
}

/// Lexicon-driven annotator that needs no trained model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAnnotator;

impl RuleAnnotator {
    pub fn new() -> Self {
        RuleAnnotator
    }
}

/// A lexed token before tagging.
struct Lexeme<'a> {
    text: &'a str,
    kind: RawToken,
}

impl Annotator for RuleAnnotator {
    fn name(&self) -> &str {
        NAME
    }

    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError> {
        let mut sentences: Vec<Vec<Lexeme<'_>>> = Vec::new();
        let mut current = Vec::new();
        let mut lexer = RawToken::lexer(text);
        while let Some(result) = lexer.next() {
            // Characters no rule covers are kept as opaque words.
            let kind = result.unwrap_or(RawToken::Word);
            current.push(Lexeme {
                text: lexer.slice(),
                kind,
            });
            if kind == RawToken::Terminal {
                sentences.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            sentences.push(current);
        }

        let mut specs = Vec::new();
        let mut ranges = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            let start = specs.len();
            specs.extend(annotate_sentence(sentence, start));
            ranges.push(start..specs.len());
        }

        AnnotatedDocument::new(specs, ranges).map_err(|source| AnnotationError::Malformed {
            annotator: NAME.to_string(),
            source,
        })
    }
}

fn tag(
    lexeme: &Lexeme<'_>,
    lower: &str,
    previous: Option<PartOfSpeech>,
    first: bool,
) -> PartOfSpeech {
    match lexeme.kind {
        RawToken::Terminal => PartOfSpeech::Punct,
        RawToken::Number => PartOfSpeech::Num,
        RawToken::Symbol => {
            let is_mark = |c: char| c.is_ascii_punctuation() && !"$%&+<=>^|~#@*".contains(c);
            if lexeme.text.chars().all(is_mark) {
                PartOfSpeech::Punct
            } else {
                PartOfSpeech::Sym
            }
        }
        RawToken::Word => {
            if PRONOUNS.contains(&lower) {
                PartOfSpeech::Pron
            } else if DETERMINERS.contains(&lower) {
                PartOfSpeech::Det
            } else if AUXILIARIES.contains(&lower) {
                PartOfSpeech::Aux
            } else if ADPOSITIONS.contains(&lower) {
                PartOfSpeech::Adp
            } else if COORDINATORS.contains(&lower) {
                PartOfSpeech::Cconj
            } else if SUBORDINATORS.contains(&lower) {
                PartOfSpeech::Sconj
            } else if lower.len() > 4 && lower.ends_with("ly") {
                PartOfSpeech::Adv
            } else if !first && lexeme.text.chars().next().is_some_and(char::is_uppercase) {
                PartOfSpeech::Propn
            } else if matches!(previous, Some(PartOfSpeech::Pron | PartOfSpeech::Aux)) {
                PartOfSpeech::Verb
            } else {
                PartOfSpeech::Noun
            }
        }
    }
}

/// Tag one sentence and attach every token to the sentence root.
/// `offset` is the document index of the sentence's first token.
fn annotate_sentence(lexemes: &[Lexeme<'_>], offset: usize) -> Vec<TokenSpec> {
    let mut tagged = Vec::with_capacity(lexemes.len());
    let mut previous = None;
    for (i, lexeme) in lexemes.iter().enumerate() {
        let lower = lexeme.text.to_lowercase();
        let pos = tag(lexeme, &lower, previous, i == 0);
        previous = Some(pos);
        tagged.push((lexeme.text, lower, pos));
    }

    let root = tagged
        .iter()
        .position(|(_, _, pos)| *pos == PartOfSpeech::Verb)
        .or_else(|| {
            tagged
                .iter()
                .position(|(_, _, pos)| !matches!(pos, PartOfSpeech::Punct | PartOfSpeech::Sym))
        })
        .unwrap_or(0);

    let mut seen_subject = false;
    let mut seen_object = false;
    tagged
        .into_iter()
        .enumerate()
        .map(|(i, (text, lemma, pos))| {
            let dep = if i == root {
                "ROOT"
            } else {
                match pos {
                    PartOfSpeech::Punct => "punct",
                    PartOfSpeech::Det => "det",
                    PartOfSpeech::Aux => "aux",
                    PartOfSpeech::Adv => "advmod",
                    PartOfSpeech::Pron | PartOfSpeech::Noun | PartOfSpeech::Propn
                        if i < root && !seen_subject =>
                    {
                        seen_subject = true;
                        "nsubj"
                    }
                    PartOfSpeech::Pron | PartOfSpeech::Noun | PartOfSpeech::Propn
                        if i > root && !seen_object =>
                    {
                        seen_object = true;
                        "obj"
                    }
                    _ => "dep",
                }
            };
            TokenSpec::new(text, lemma, pos, dep, offset + root)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(doc: &AnnotatedDocument) -> Vec<&str> {
        doc.tokens().iter().map(|t| t.text()).collect()
    }

    #[test]
    fn test_tokenizes_and_splits_sentences() {
        let doc = RuleAnnotator::new()
            .annotate("The cat sat. It purred loudly!")
            .unwrap();
        assert_eq!(
            texts(&doc),
            vec!["The", "cat", "sat", ".", "It", "purred", "loudly", "!"]
        );
        assert_eq!(doc.sentence_count(), 2);
        let ranges: Vec<_> = doc.sentences().map(|s| s.range()).collect();
        assert_eq!(ranges, vec![0..4, 4..8]);
    }

    #[test]
    fn test_closed_class_tags() {
        let doc = RuleAnnotator::new().annotate("She read the book.").unwrap();
        let tags: Vec<PartOfSpeech> = doc.tokens().iter().map(|t| t.pos()).collect();
        assert_eq!(
            tags,
            vec![
                PartOfSpeech::Pron,
                PartOfSpeech::Verb,
                PartOfSpeech::Det,
                PartOfSpeech::Noun,
                PartOfSpeech::Punct
            ]
        );
        let deps: Vec<&str> = doc.tokens().iter().map(|t| t.dep()).collect();
        assert_eq!(deps, vec!["nsubj", "root", "det", "obj", "punct"]);
    }

    #[test]
    fn test_trees_are_one_level_deep() {
        let doc = RuleAnnotator::new().annotate("We like short trees").unwrap();
        let sentence = doc.sentences().next().unwrap();
        assert_eq!(sentence.root().text(), "like");
        assert_eq!(sentence.depth(), 2);
    }

    #[test]
    fn test_empty_text() {
        let doc = RuleAnnotator::new().annotate("   \n").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.sentence_count(), 0);
    }

    #[test]
    fn test_lemmas_are_lower_case() {
        let doc = RuleAnnotator::new().annotate("Dogs RUN").unwrap();
        assert_eq!(doc.token(0).lemma(), "dogs");
        assert_eq!(doc.token(1).lemma(), "run");
    }
}
