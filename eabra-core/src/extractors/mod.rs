//! Extractor families
//!
//! A family reads an [`AnnotatedDocument`] and emits a [`FeatureRecord`]. It
//! either builds per-unit sequences (one value per sentence or per word) and
//! names their 18 statistics with [`aggregate_feature`](crate::aggregate::aggregate_feature),
//! or emits whole-document scalars under literal names.
//!
//! Families are independent: they share the document read-only, keep no
//! mutable state, and own disjoint name prefixes.
//!
//! | family      | prefixes                                         |
//! |-------------|--------------------------------------------------|
//! | `length`    | `LENsntWRD`, `LENwrdLETTERS`, `LENwrdSTEM`, `LENwrdSYL` |
//! | `lexical`   | `LEXdvrW*` (six scalars)                         |
//! | `syntactic` | `SYNdevHGT`, `SYNdep*`                           |
//! | `discourse` | `DISrefPN`, `DISrefDN`                           |

pub mod discourse;
pub mod length;
pub mod lexical;
pub mod syntactic;

use std::sync::Arc;

use crate::document::AnnotatedDocument;
use crate::error::Result;
use crate::facilities::{LexicalDiversity, StandardDiversity, SyllableCounter, VowelGroupCounter};
use crate::record::FeatureRecord;

pub use discourse::DiscourseExtractor;
pub use length::LengthExtractor;
pub use lexical::LexicalExtractor;
pub use syntactic::SyntacticExtractor;

/// Trait for extractor families.
pub trait FeatureExtractor: Send + Sync {
    /// Family name used in configuration and error messages.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Every feature name this family can emit, in emission order.
    fn feature_names(&self) -> Vec<String>;

    /// Measure one document.
    fn extract(&self, doc: &AnnotatedDocument) -> Result<FeatureRecord>;
}

/// Shared facilities handed to the built-in families.
#[derive(Clone)]
pub struct ExtractorOptions {
    pub syllables: Arc<dyn SyllableCounter>,
    pub diversity: Arc<dyn LexicalDiversity>,
}

impl ExtractorOptions {
    pub fn with_mtld_threshold(threshold: f64) -> Self {
        ExtractorOptions {
            diversity: Arc::new(StandardDiversity::with_threshold(threshold)),
            ..Self::default()
        }
    }
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        ExtractorOptions {
            syllables: Arc::new(VowelGroupCounter::new()),
            diversity: Arc::new(StandardDiversity::new()),
        }
    }
}

/// Names of the built-in families, in default execution order.
pub const DEFAULT_FAMILIES: &[&str] = &[
    length::NAME,
    lexical::NAME,
    syntactic::NAME,
    discourse::NAME,
];

/// Instantiate a built-in family by name.
pub fn extractor_by_name(
    name: &str,
    options: &ExtractorOptions,
) -> Option<Box<dyn FeatureExtractor>> {
    let extractor: Box<dyn FeatureExtractor> = match name {
        length::NAME => Box::new(LengthExtractor::new(options.syllables.clone())),
        lexical::NAME => Box::new(LexicalExtractor::new(options.diversity.clone())),
        syntactic::NAME => Box::new(SyntacticExtractor::new()),
        discourse::NAME => Box::new(DiscourseExtractor::new()),
        _ => return None,
    };
    Some(extractor)
}
