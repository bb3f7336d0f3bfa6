//! Feature extraction pipeline
//!
//! A [`Pipeline`] owns one annotator and an ordered [`ExtractorRegistry`]. Each
//! text is annotated once; every family then reads the same document and the
//! family records are merged, in registry order, into one flat record.
//!
//! Families may run concurrently (they share the document read-only), and batch
//! rows may too. Output order never depends on scheduling: family records are
//! merged in registry order and batch rows come back in input order.
//!
//! ```ignore
//! let pipeline = Pipeline::builder().build();
//! let features = pipeline.process_text("The cat sat on the mat.")?;
//! let results = pipeline.process_batch(&table, "text")?;
//! pipeline.close();
//! ```

use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::annotation::{Annotator, RuleAnnotator};
use crate::document::AnnotatedDocument;
use crate::error::{EabraError, Result};
use crate::extractors::{ExtractorOptions, FeatureExtractor};
use crate::record::FeatureRecord;
use crate::registry::ExtractorRegistry;
use crate::table::{ResultRow, ResultTable, Table};

/// Builder for [`Pipeline`]. Unset parts fall back to the rule annotator and
/// the four built-in families.
#[derive(Default)]
pub struct PipelineBuilder {
    annotator: Option<Box<dyn Annotator>>,
    registry: Option<ExtractorRegistry>,
    sequential: bool,
}

impl PipelineBuilder {
    pub fn annotator<A: Annotator + 'static>(self, annotator: A) -> Self {
        self.boxed_annotator(Box::new(annotator))
    }

    pub fn boxed_annotator(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.annotator = Some(annotator);
        self
    }

    pub fn registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Run families and batch rows concurrently (the default).
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.sequential = !parallel;
        self
    }

    pub fn build(self) -> Pipeline {
        let annotator = self
            .annotator
            .unwrap_or_else(|| Box::new(RuleAnnotator::new()));
        let registry = self
            .registry
            .unwrap_or_else(|| ExtractorRegistry::with_defaults(&ExtractorOptions::default()));
        info!(
            annotator = annotator.name(),
            families = ?registry.list_families(),
            parallel = !self.sequential,
            "pipeline ready"
        );
        Pipeline {
            annotator,
            registry,
            parallel: !self.sequential,
        }
    }
}

/// Annotate-then-extract pipeline.
pub struct Pipeline {
    annotator: Box<dyn Annotator>,
    registry: ExtractorRegistry,
    parallel: bool,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Every feature name the pipeline can emit, in output order.
    pub fn feature_catalog(&self) -> Vec<String> {
        self.registry.feature_catalog()
    }

    /// Annotate `text` and extract every family's features.
    pub fn process_text(&self, text: &str) -> Result<FeatureRecord> {
        let doc = self.annotator.annotate(text)?;
        debug!(
            tokens = doc.len(),
            sentences = doc.sentence_count(),
            "annotated text"
        );
        self.process_document(&doc)
    }

    /// Extract features from an already annotated document.
    pub fn process_document(&self, doc: &AnnotatedDocument) -> Result<FeatureRecord> {
        let extractors = self.registry.extractors();
        let outputs: Vec<Result<FeatureRecord>> = if self.parallel {
            extractors
                .par_iter()
                .map(|extractor| run_family(extractor.as_ref(), doc))
                .collect()
        } else {
            extractors
                .iter()
                .map(|extractor| run_family(extractor.as_ref(), doc))
                .collect()
        };

        let mut merged = FeatureRecord::new();
        for (extractor, output) in extractors.iter().zip(outputs) {
            merged
                .merge_disjoint(output?)
                .map_err(|key| EabraError::DuplicateFeature {
                    key,
                    family: extractor.name().to_string(),
                })?;
        }
        Ok(merged)
    }

    /// Process the `text_field` column of every row.
    ///
    /// Rows keep their order and original fields. The first failing row
    /// aborts the batch, and the error names that row.
    pub fn process_batch(&self, table: &Table, text_field: &str) -> Result<ResultTable> {
        let column = table
            .column_index(text_field)
            .ok_or_else(|| EabraError::MissingColumn(text_field.to_string()))?;
        info!(rows = table.len(), text_field, "processing batch");

        let process_row = |(index, fields): (usize, &Vec<String>)| -> Result<ResultRow> {
            debug!(row = index, "processing row");
            let features = self
                .process_text(&fields[column])
                .map_err(|err| err.at_row(index))?;
            Ok(ResultRow {
                fields: fields.clone(),
                features,
            })
        };
        let rows: Vec<ResultRow> = if self.parallel {
            table
                .rows()
                .par_iter()
                .enumerate()
                .map(process_row)
                .collect::<Result<_>>()?
        } else {
            table
                .rows()
                .iter()
                .enumerate()
                .map(process_row)
                .collect::<Result<_>>()?
        };

        let results = ResultTable::new(table.columns().to_vec(), rows);
        info!(
            rows = results.len(),
            features = results.feature_columns().len(),
            "batch complete"
        );
        Ok(results)
    }

    /// Release the annotator and the families.
    pub fn close(self) {
        info!(annotator = self.annotator.name(), "pipeline closed");
    }
}

fn run_family(extractor: &dyn FeatureExtractor, doc: &AnnotatedDocument) -> Result<FeatureRecord> {
    let record = extractor.extract(doc).map_err(|err| match err {
        err @ EabraError::Extractor { .. } => err,
        other => EabraError::Extractor {
            family: extractor.name().to_string(),
            message: other.to_string(),
        },
    })?;
    trace!(family = extractor.name(), features = record.len(), "family done");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::cat_document;

    struct Echo(&'static str);

    impl FeatureExtractor for Echo {
        fn name(&self) -> &str {
            self.0
        }
        fn feature_names(&self) -> Vec<String> {
            vec![format!("{}_tokens", self.0)]
        }
        fn extract(&self, doc: &AnnotatedDocument) -> Result<FeatureRecord> {
            let mut record = FeatureRecord::new();
            record.insert(format!("{}_tokens", self.0), doc.len() as f64);
            Ok(record)
        }
    }

    // Declares nothing, then emits a name another family owns
    struct Sneaky;

    impl FeatureExtractor for Sneaky {
        fn name(&self) -> &str {
            "sneaky"
        }
        fn feature_names(&self) -> Vec<String> {
            Vec::new()
        }
        fn extract(&self, _doc: &AnnotatedDocument) -> Result<FeatureRecord> {
            let mut record = FeatureRecord::new();
            record.insert("a_tokens", 0.0);
            Ok(record)
        }
    }

    struct Broken;

    impl FeatureExtractor for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn feature_names(&self) -> Vec<String> {
            Vec::new()
        }
        fn extract(&self, _doc: &AnnotatedDocument) -> Result<FeatureRecord> {
            Err(EabraError::UnknownFamily("nothing".to_string()))
        }
    }

    fn pipeline_with(extractors: Vec<Box<dyn FeatureExtractor>>, parallel: bool) -> Pipeline {
        let mut registry = ExtractorRegistry::new();
        for extractor in extractors {
            registry.register_boxed(extractor).unwrap();
        }
        Pipeline::builder()
            .registry(registry)
            .parallel(parallel)
            .build()
    }

    #[test]
    fn test_merges_in_registry_order() {
        for parallel in [true, false] {
            let pipeline = pipeline_with(
                vec![Box::new(Echo("c")), Box::new(Echo("a")), Box::new(Echo("b"))],
                parallel,
            );
            let record = pipeline.process_document(&cat_document()).unwrap();
            assert_eq!(
                record.keys().collect::<Vec<_>>(),
                vec!["c_tokens", "a_tokens", "b_tokens"]
            );
            assert_eq!(record.get("a_tokens"), Some(10.0));
        }
    }

    #[test]
    fn test_runtime_duplicate_is_rejected() {
        let pipeline = pipeline_with(vec![Box::new(Echo("a")), Box::new(Sneaky)], false);
        let err = pipeline.process_document(&cat_document()).unwrap_err();
        assert!(matches!(
            err,
            EabraError::DuplicateFeature { ref key, ref family }
                if key == "a_tokens" && family == "sneaky"
        ));
    }

    #[test]
    fn test_family_failure_names_the_family() {
        let pipeline = pipeline_with(vec![Box::new(Broken)], true);
        let err = pipeline.process_document(&cat_document()).unwrap_err();
        assert!(matches!(err, EabraError::Extractor { ref family, .. } if family == "broken"));
    }

    #[test]
    fn test_default_pipeline_catalog() {
        let pipeline = Pipeline::builder().build();
        assert_eq!(pipeline.annotator().name(), "rules");
        assert!(pipeline.is_parallel());
        assert_eq!(pipeline.feature_catalog().len(), 276);
        pipeline.close();
    }

    #[test]
    fn test_batch_missing_column() {
        let pipeline = Pipeline::builder().build();
        let table = Table::new(["id", "body"]);
        let err = pipeline.process_batch(&table, "text").unwrap_err();
        assert!(matches!(err, EabraError::MissingColumn(ref name) if name == "text"));
    }

    #[test]
    fn test_empty_batch() {
        let pipeline = Pipeline::builder().build();
        let table = Table::new(["text"]);
        let results = pipeline.process_batch(&table, "text").unwrap();
        assert!(results.is_empty());
        assert_eq!(results.columns(), vec!["text"]);
    }
}
