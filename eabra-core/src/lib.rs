//! # eabra-core
//!
//! Linguistic complexity features for text.
//!
//! Each text is annotated once (tokens, lemmas, part-of-speech tags, sentence
//! boundaries and a dependency tree per sentence) and then measured by a set of
//! independent extractor families. Per-unit measurements (words per sentence,
//! letters per word, tree depth per sentence, ...) are summarised by the same 18
//! statistics; whole-document measurements are emitted as single values.
//!
//! Layout:
//!
//!     src/
//!       ├── aggregate     The 18 descriptive statistics and feature naming
//!       ├── annotation    Annotation providers (rules, spacy-json)
//!       ├── document      The annotated document model
//!       ├── extractors    Extractor families (length, lexical, syntactic, discourse)
//!       ├── facilities    Syllable counting and lexical diversity
//!       ├── pipeline      Annotate-then-extract over texts and tables
//!       ├── record        Flat feature records
//!       ├── registry      Ordered extractor registry
//!       └── table         Input tables and result tables
//!
//! Statistics never fail: empty or degenerate input yields zeros, and every
//! emitted value is finite.

pub mod aggregate;
pub mod annotation;
pub mod document;
pub mod error;
pub mod extractors;
pub mod facilities;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod table;
pub mod testing;

pub use aggregate::{aggregate, aggregate_feature, AggregateRecord, Statistic};
pub use annotation::{annotator_by_name, Annotator, RuleAnnotator, SpacyJsonAnnotator};
pub use document::{AnnotatedDocument, PartOfSpeech, Token, TokenSpec};
pub use error::{AnnotationError, DocumentError, EabraError, Result};
pub use extractors::{ExtractorOptions, FeatureExtractor};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use record::FeatureRecord;
pub use registry::ExtractorRegistry;
pub use table::{Cell, ResultRow, ResultTable, Table};
