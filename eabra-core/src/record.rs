//! Feature records
//!
//! A [`FeatureRecord`] maps feature names to values, remembering insertion
//! order so exported columns come out in a stable order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named features for one document (or one extractor family's share of it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    features: IndexMap<String, f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FeatureRecord {
            features: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a feature, returning the previous value if the name was taken.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.features.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.features.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Move every feature of `other` into `self`.
    ///
    /// Fails with the first name present in both records; `self` is left
    /// untouched in that case.
    pub fn merge_disjoint(&mut self, other: FeatureRecord) -> Result<(), String> {
        if let Some(clash) = other.keys().find(|k| self.contains(k)) {
            return Err(clash.to_string());
        }
        self.features.extend(other.features);
        Ok(())
    }
}

impl FromIterator<(String, f64)> for FeatureRecord {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        FeatureRecord {
            features: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, f64)> for FeatureRecord {
    fn extend<T: IntoIterator<Item = (String, f64)>>(&mut self, iter: T) {
        self.features.extend(iter);
    }
}

impl IntoIterator for FeatureRecord {
    type Item = (String, f64);
    type IntoIter = indexmap::map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut record = FeatureRecord::new();
        record.insert("b", 1.0);
        record.insert("a", 2.0);
        record.insert("c", 3.0);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_disjoint() {
        let mut left: FeatureRecord = vec![("x".to_string(), 1.0)].into_iter().collect();
        let right: FeatureRecord = vec![("y".to_string(), 2.0)].into_iter().collect();
        left.merge_disjoint(right).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left.get("y"), Some(2.0));
    }

    #[test]
    fn test_merge_rejects_overlap_without_partial_write() {
        let mut left: FeatureRecord = vec![("x".to_string(), 1.0)].into_iter().collect();
        let right: FeatureRecord = vec![("z".to_string(), 5.0), ("x".to_string(), 9.0)]
            .into_iter()
            .collect();
        assert_eq!(left.merge_disjoint(right), Err("x".to_string()));
        assert_eq!(left.len(), 1);
        assert_eq!(left.get("x"), Some(1.0));
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let record: FeatureRecord = vec![("LEXdvrWST".to_string(), 0.5)].into_iter().collect();
        insta::assert_snapshot!(serde_json::to_string(&record).unwrap(), @r#"{"LEXdvrWST":0.5}"#);
    }
}
