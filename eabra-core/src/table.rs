//! Input and result tables
//!
//! [`Table`] is the caller's row-oriented input: named string columns, one of
//! which holds the text to analyse. [`ResultTable`] keeps every original row,
//! in order, next to the row's feature record.
//!
//! Result columns are the original columns followed by every feature name in
//! first-appearance order across the batch. A row that lacks a feature (the
//! lexical family emits nothing for a text without words) has a missing cell
//! there; exporters render it with a caller-chosen marker.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::error::{EabraError, Result};
use crate::record::FeatureRecord;

/// Row-oriented input table of string fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; it must have one field per column.
    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) -> Result<()> {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(EabraError::RaggedRow {
                index: self.rows.len(),
                found: row.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Read a headed CSV document.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let mut table = Table::new(csv.headers()?.iter());
        for record in csv.records() {
            table.push_row(record?.iter())?;
        }
        Ok(table)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv_reader(File::open(path)?)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// One input row with its features.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub fields: Vec<String>,
    pub features: FeatureRecord,
}

/// A single cell of a [`ResultTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

/// Batch output: original fields plus features, one row per input row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    original_columns: Vec<String>,
    feature_columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Assemble a table, deriving the feature columns from the rows.
    pub fn new(original_columns: Vec<String>, rows: Vec<ResultRow>) -> Self {
        let mut feature_columns: IndexSet<String> = IndexSet::new();
        for row in &rows {
            for key in row.features.keys() {
                if !feature_columns.contains(key) {
                    feature_columns.insert(key.to_string());
                }
            }
        }
        ResultTable {
            original_columns,
            feature_columns: feature_columns.into_iter().collect(),
            rows,
        }
    }

    pub fn original_columns(&self) -> &[String] {
        &self.original_columns
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// All column names: original columns first, then feature columns.
    pub fn columns(&self) -> Vec<&str> {
        self.original_columns
            .iter()
            .chain(&self.feature_columns)
            .map(String::as_str)
            .collect()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a cell. Original columns shadow feature columns of the same name.
    pub fn cell(&self, row: usize, column: &str) -> Option<Cell<'_>> {
        let row = self.rows.get(row)?;
        if let Some(index) = self.original_columns.iter().position(|c| c == column) {
            return Some(Cell::Text(&row.fields[index]));
        }
        if !self.feature_columns.iter().any(|c| c == column) {
            return None;
        }
        Some(match row.features.get(column) {
            Some(value) => Cell::Number(value),
            None => Cell::Missing,
        })
    }

    /// Write the table as CSV, rendering missing features as `missing`.
    pub fn write_csv<W: Write>(&self, writer: W, missing: &str) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.columns())?;
        for row in &self.rows {
            let features = self.feature_columns.iter().map(|column| {
                row.features
                    .get(column)
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| missing.to_string())
            });
            let record: Vec<String> = row.fields.iter().cloned().chain(features).collect();
            csv.write_record(&record)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Rows as an array of JSON objects; missing features become `null`.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for (column, field) in self.original_columns.iter().zip(&row.fields) {
                    object.insert(column.clone(), Value::String(field.clone()));
                }
                for column in &self.feature_columns {
                    let value = row
                        .features
                        .get(column)
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null);
                    object.entry(column.clone()).or_insert(value);
                }
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, f64)]) -> FeatureRecord {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn sample() -> ResultTable {
        ResultTable::new(
            vec!["id".to_string(), "text".to_string()],
            vec![
                ResultRow {
                    fields: vec!["1".to_string(), "Hello there".to_string()],
                    features: record(&[("a", 1.0), ("b", 0.5)]),
                },
                ResultRow {
                    fields: vec!["2".to_string(), "!".to_string()],
                    features: record(&[("a", 2.0)]),
                },
            ],
        )
    }

    #[test]
    fn test_csv_input() {
        let input = "id,text\n1,\"Hello, world\"\n2,Bye\n";
        let table = Table::from_csv_reader(input.as_bytes()).unwrap();
        assert_eq!(table.columns(), &["id", "text"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][1], "Hello, world");
        assert_eq!(table.column_index("text"), Some(1));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let mut table = Table::new(["id", "text"]);
        let err = table.push_row(["only one"]).unwrap_err();
        assert!(matches!(
            err,
            EabraError::RaggedRow {
                index: 0,
                found: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_columns_in_first_appearance_order() {
        let table = sample();
        assert_eq!(table.columns(), vec!["id", "text", "a", "b"]);
        assert_eq!(table.cell(1, "b"), Some(Cell::Missing));
        assert_eq!(table.cell(0, "b"), Some(Cell::Number(0.5)));
        assert_eq!(table.cell(1, "text"), Some(Cell::Text("!")));
        assert_eq!(table.cell(0, "zzz"), None);
        assert_eq!(table.cell(5, "a"), None);
    }

    #[test]
    fn test_csv_output_marks_missing() {
        let mut out = Vec::new();
        sample().write_csv(&mut out, "NA").unwrap();
        let text = String::from_utf8(out).unwrap();
        insta::assert_snapshot!(text.replace('\n', "|"), @"id,text,a,b|1,Hello there,1,0.5|2,!,2,NA|");
    }

    #[test]
    fn test_json_output_uses_null() {
        let json = sample().to_json();
        assert_eq!(json[0]["a"], 1.0);
        assert_eq!(json[1]["text"], "!");
        assert!(json[1]["b"].is_null());
    }
}
