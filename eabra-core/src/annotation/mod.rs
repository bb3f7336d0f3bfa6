//! Annotation providers
//!
//! An [`Annotator`] turns raw text into an [`AnnotatedDocument`]. The pipeline
//! owns exactly one annotator for its whole lifetime; callers pick it when the
//! pipeline is built.
//!
//! Built-in providers:
//!
//! - [`RuleAnnotator`] (`rules`): lexicon and punctuation driven, no model
//!   required. Good enough for length and lexical features; its dependency
//!   trees are shallow.
//! - [`SpacyJsonAnnotator`] (`spacy-json`): reads documents already annotated
//!   by spaCy and serialised with `Doc.to_json()`.

pub mod rules;
pub mod spacy_json;

use crate::document::AnnotatedDocument;
use crate::error::AnnotationError;

pub use rules::RuleAnnotator;
pub use spacy_json::SpacyJsonAnnotator;

/// Trait for annotation providers.
pub trait Annotator: Send + Sync {
    /// Name used in configuration and error messages.
    fn name(&self) -> &str;

    /// Annotate one text.
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError>;
}

/// Names accepted by [`annotator_by_name`].
pub const AVAILABLE_ANNOTATORS: &[&str] = &[rules::NAME, spacy_json::NAME];

/// Instantiate a built-in annotator by name.
pub fn annotator_by_name(name: &str) -> Result<Box<dyn Annotator>, AnnotationError> {
    match name {
        rules::NAME => Ok(Box::new(RuleAnnotator::new())),
        spacy_json::NAME => Ok(Box::new(SpacyJsonAnnotator::new())),
        other => Err(AnnotationError::UnknownAnnotator(other.to_string())),
    }
}
