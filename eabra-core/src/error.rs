//! Error types for annotation, document validation and feature extraction.
//!
//! Degenerate numeric input is never an error (see [`crate::aggregate`]); the
//! variants here cover contract violations that must abort a document.

use std::io;

use thiserror::Error;

/// Failure while turning raw text into an [`AnnotatedDocument`](crate::document::AnnotatedDocument).
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("annotator '{annotator}' rejected its input: {reason}")]
    InvalidInput { annotator: String, reason: String },
    #[error("annotator '{annotator}' produced a malformed document: {source}")]
    Malformed {
        annotator: String,
        #[source]
        source: DocumentError,
    },
    #[error("unknown annotator '{0}'")]
    UnknownAnnotator(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Structural problem in an annotated document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("sentence {sentence} spans tokens {start}..{end} but the document has {len} tokens")]
    SentenceOutOfBounds {
        sentence: usize,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("sentence {sentence} overlaps or precedes the previous sentence")]
    SentenceOverlap { sentence: usize },
    #[error("token {token} is not covered by any sentence")]
    UncoveredToken { token: usize },
    #[error("token {token} has head {head} outside its sentence {start}..{end}")]
    HeadOutsideSentence {
        token: usize,
        head: usize,
        start: usize,
        end: usize,
    },
    #[error("sentence {sentence} has {roots} roots, expected exactly one")]
    RootCount { sentence: usize, roots: usize },
    #[error("token {token} is part of a dependency cycle")]
    Cycle { token: usize },
    #[error("character span {start}..{end} is outside the text ({len} characters)")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
}

/// Crate-level error for pipeline construction and execution.
#[derive(Debug, Error)]
pub enum EabraError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("feature '{key}' from family '{family}' was already emitted by another family")]
    DuplicateFeature { key: String, family: String },
    #[error("extractor family '{family}' failed: {message}")]
    Extractor { family: String, message: String },
    #[error("unknown extractor family '{0}'")]
    UnknownFamily(String),
    #[error("text column '{0}' not found")]
    MissingColumn(String),
    #[error("row {index} has {found} fields, expected {expected}")]
    RaggedRow {
        index: usize,
        found: usize,
        expected: usize,
    },
    #[error("row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<EabraError>,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl EabraError {
    /// Attach the batch row index to an error raised while processing that row.
    pub fn at_row(self, index: usize) -> Self {
        EabraError::Row {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T, E = EabraError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_context_display() {
        let err = EabraError::DuplicateFeature {
            key: "LENsntWRD_sum".to_string(),
            family: "length".to_string(),
        }
        .at_row(4);
        assert_eq!(
            err.to_string(),
            "row 4: feature 'LENsntWRD_sum' from family 'length' was already emitted by another family"
        );
    }

    #[test]
    fn test_document_error_display() {
        let err = DocumentError::RootCount {
            sentence: 2,
            roots: 0,
        };
        assert_eq!(
            err.to_string(),
            "sentence 2 has 0 roots, expected exactly one"
        );
    }
}
