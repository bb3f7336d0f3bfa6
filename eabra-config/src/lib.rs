//! Configuration loader for eabra.
//!
//! `defaults/eabra.default.toml` is embedded into every binary so the shipped
//! defaults and the documented ones never drift. Applications layer user files
//! and command-line overrides on top via [`Loader`] before deserializing into
//! [`EabraConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use eabra_core::annotation::annotator_by_name;
use eabra_core::extractors::ExtractorOptions;
use eabra_core::{EabraError, ExtractorRegistry, Pipeline};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/eabra.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EabraConfig {
    pub annotation: AnnotationConfig,
    pub pipeline: PipelineConfig,
    pub lexical: LexicalConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationConfig {
    pub provider: String,
}

/// Which families run, in which order, and whether concurrently.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub families: Vec<String>,
    pub parallel: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexicalConfig {
    pub mtld_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub missing_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl EabraConfig {
    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions::with_mtld_threshold(self.lexical.mtld_threshold)
    }

    /// Build the pipeline this configuration describes.
    pub fn build_pipeline(&self) -> Result<Pipeline, EabraError> {
        let annotator = annotator_by_name(&self.annotation.provider)?;
        let registry = ExtractorRegistry::with_families(
            self.pipeline.families.as_slice(),
            &self.extractor_options(),
        )?;
        Ok(Pipeline::builder()
            .boxed_annotator(annotator)
            .registry(registry)
            .parallel(self.pipeline.parallel)
            .build())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let threshold = self.lexical.mtld_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Message(format!(
                "lexical.mtld_threshold must be in (0, 1], got {threshold}"
            )));
        }
        Ok(self)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and check the result.
    pub fn build(self) -> Result<EabraConfig, ConfigError> {
        self.builder
            .build()?
            .try_deserialize::<EabraConfig>()?
            .validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<EabraConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.annotation.provider, "rules");
        assert_eq!(
            config.pipeline.families,
            vec!["length", "lexical", "syntactic", "discourse"]
        );
        assert!(config.pipeline.parallel);
        assert_eq!(config.lexical.mtld_threshold, 0.72);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.missing_value, "");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.format", "json")
            .expect("override to apply")
            .set_override("pipeline.families", vec!["syntactic", "length"])
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.pipeline.families, vec!["syntactic", "length"]);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pipeline]\nparallel = false\n\n[lexical]\nmtld_threshold = 0.5").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert!(!config.pipeline.parallel);
        assert_eq!(config.lexical.mtld_threshold, 0.5);
        // Untouched keys keep their defaults.
        assert_eq!(config.annotation.provider, "rules");
    }

    #[test]
    fn optional_file_may_be_absent() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/eabra.toml")
            .build()
            .unwrap();
        assert_eq!(config.pipeline.families.len(), 4);
        assert!(Loader::new()
            .with_file("/nonexistent/eabra.toml")
            .build()
            .is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = Loader::new()
            .set_override("lexical.mtld_threshold", 1.5)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("mtld_threshold"));
    }

    #[test]
    fn builds_configured_pipeline() {
        let config = Loader::new()
            .set_override("pipeline.families", vec!["discourse"])
            .unwrap()
            .set_override("pipeline.parallel", false)
            .unwrap()
            .build()
            .unwrap();
        let pipeline = config.build_pipeline().unwrap();
        assert_eq!(pipeline.registry().list_families(), vec!["discourse"]);
        assert_eq!(pipeline.feature_catalog().len(), 36);
        assert!(!pipeline.is_parallel());
    }

    #[test]
    fn unknown_provider_fails_at_pipeline_build() {
        let config = Loader::new()
            .set_override("annotation.provider", "stanza")
            .unwrap()
            .build()
            .unwrap();
        assert!(config.build_pipeline().is_err());
    }
}
