//! Extractor registry
//!
//! Holds the extractor families a pipeline runs, in execution order. Families
//! are registered by value and addressed by name. Registration checks the
//! declared feature names, so two families can never claim the same feature.

use std::collections::HashSet;

use crate::error::{EabraError, Result};
use crate::extractors::{extractor_by_name, ExtractorOptions, FeatureExtractor, DEFAULT_FAMILIES};

/// Ordered set of extractor families.
///
/// # Examples
///
/// ```ignore
/// let mut registry = ExtractorRegistry::new();
/// registry.register(SyntacticExtractor::new())?;
///
/// let family = registry.get("syntactic")?;
/// let features = family.extract(&doc)?;
/// ```
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field(
                "extractors",
                &self.extractors.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ExtractorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ExtractorRegistry {
            extractors: Vec::new(),
        }
    }

    /// Register a family at the end of the execution order.
    pub fn register<E: FeatureExtractor + 'static>(&mut self, extractor: E) -> Result<()> {
        self.register_boxed(Box::new(extractor))
    }

    /// Register an already boxed family.
    ///
    /// Fails if a family with the same name is present or if any declared
    /// feature name is already claimed.
    pub fn register_boxed(&mut self, extractor: Box<dyn FeatureExtractor>) -> Result<()> {
        if self.has(extractor.name()) {
            return Err(EabraError::Extractor {
                family: extractor.name().to_string(),
                message: "a family with this name is already registered".to_string(),
            });
        }
        let claimed: HashSet<String> = self.feature_catalog().into_iter().collect();
        if let Some(clash) = extractor
            .feature_names()
            .into_iter()
            .find(|name| claimed.contains(name))
        {
            return Err(EabraError::DuplicateFeature {
                key: clash,
                family: extractor.name().to_string(),
            });
        }
        self.extractors.push(extractor);
        Ok(())
    }

    /// Get a family by name
    pub fn get(&self, name: &str) -> Result<&dyn FeatureExtractor> {
        self.extractors
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.as_ref())
            .ok_or_else(|| EabraError::UnknownFamily(name.to_string()))
    }

    /// Check if a family exists
    pub fn has(&self, name: &str) -> bool {
        self.extractors.iter().any(|e| e.name() == name)
    }

    /// Family names in execution order
    pub fn list_families(&self) -> Vec<String> {
        self.extractors.iter().map(|e| e.name().to_string()).collect()
    }

    pub(crate) fn extractors(&self) -> &[Box<dyn FeatureExtractor>] {
        &self.extractors
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn FeatureExtractor> {
        self.extractors.iter().map(|e| e.as_ref())
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Every feature name the registered families declare, in execution order.
    pub fn feature_catalog(&self) -> Vec<String> {
        self.extractors
            .iter()
            .flat_map(|e| e.feature_names())
            .collect()
    }

    /// Build a registry from built-in family names, keeping the given order.
    pub fn with_families<S: AsRef<str>>(names: &[S], options: &ExtractorOptions) -> Result<Self> {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref();
            let extractor = extractor_by_name(name, options)
                .ok_or_else(|| EabraError::UnknownFamily(name.to_string()))?;
            registry.register_boxed(extractor)?;
        }
        Ok(registry)
    }

    /// Registry with the four built-in families.
    pub fn with_defaults(options: &ExtractorOptions) -> Self {
        let mut registry = Self::new();
        for name in DEFAULT_FAMILIES {
            if let Some(extractor) = extractor_by_name(name, options) {
                // Built-in families own disjoint prefixes.
                let _ = registry.register_boxed(extractor);
            }
        }
        registry
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults(&ExtractorOptions::default())
    }
}
