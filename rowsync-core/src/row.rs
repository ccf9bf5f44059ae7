//! Source rows
//!
//! A [`Row`] is a mapping from qualified column names (`"Table.column"`)
//! to primitive [`Value`]s, exactly as the row source yields them. Column
//! qualification keeps multi-table joins unambiguous: a relationship table
//! row can carry columns from more than one logical table.

use crate::error::{CoreError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build a qualified column name from table and column parts
pub fn qualify(table: &str, column: &str) -> String {
    format!("{table}.{column}")
}

/// A single source row: qualified column name → value
///
/// Backed by a `BTreeMap` so iteration order is deterministic, which keeps
/// diagnostics and checksum computation stable without extra sorting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by qualified name, returning self for chaining
    pub fn with(mut self, qualified: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(qualified.into(), value.into());
        self
    }

    /// Set a field by qualified name
    pub fn set(&mut self, qualified: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(qualified.into(), value.into());
    }

    /// Get a field by qualified name
    pub fn get(&self, qualified: &str) -> Option<&Value> {
        self.fields.get(qualified)
    }

    /// Get a field by table and column parts
    pub fn get_column(&self, table: &str, column: &str) -> Option<&Value> {
        self.fields.get(&qualify(table, column))
    }

    /// Get a field as a string slice, treating missing and null alike
    pub fn get_str(&self, qualified: &str) -> Option<&str> {
        self.get(qualified).and_then(Value::as_str)
    }

    /// Get a field as f64
    pub fn get_f64(&self, qualified: &str) -> Option<f64> {
        self.get(qualified).and_then(Value::as_f64)
    }

    /// Get a field's canonical text, treating missing and null alike
    ///
    /// Key columns may be textual or numeric; identity derivation reads
    /// them through the same canonical form the checksum uses, so a
    /// numeric key `101.0` keys as `"101"` on every run.
    pub fn get_text(&self, qualified: &str) -> Option<String> {
        self.get(qualified)
            .filter(|v| !v.is_null())
            .map(Value::canonical_text)
    }

    /// Check whether a field is present and non-null
    pub fn has(&self, qualified: &str) -> bool {
        self.get(qualified).is_some_and(|v| !v.is_null())
    }

    /// Number of fields in the row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in column-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Split a qualified name into (table, column) parts
    pub fn split_qualified(qualified: &str) -> Result<(&str, &str)> {
        qualified
            .split_once('.')
            .filter(|(t, c)| !t.is_empty() && !c.is_empty())
            .ok_or_else(|| CoreError::invalid_column_name(qualified))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_access() {
        let row = Row::new()
            .with("Device.deviceid", "D1")
            .with("Device.reading", 21.5);

        assert_eq!(row.get_str("Device.deviceid"), Some("D1"));
        assert_eq!(row.get_column("Device", "reading"), Some(&Value::Number(21.5)));
        assert_eq!(row.get_f64("Device.reading"), Some(21.5));
        assert!(row.get("Device.missing").is_none());
    }

    #[test]
    fn test_has_treats_null_as_absent() {
        let row = Row::new().with("Coordinate.id", Value::Null);
        assert!(!row.has("Coordinate.id"));
        assert!(row.get("Coordinate.id").is_some());
    }

    #[test]
    fn test_get_text_canonicalizes_numeric_keys() {
        let row = Row::new()
            .with("Sensor.sensorid", 101.0)
            .with("Sensor.sensorname", "S101")
            .with("Sensor.unset", Value::Null);
        assert_eq!(row.get_text("Sensor.sensorid").as_deref(), Some("101"));
        assert_eq!(row.get_text("Sensor.sensorname").as_deref(), Some("S101"));
        assert_eq!(row.get_text("Sensor.unset"), None);
        assert_eq!(row.get_text("Sensor.missing"), None);
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(Row::split_qualified("Device.deviceid").unwrap(), ("Device", "deviceid"));
        assert!(Row::split_qualified("noseparator").is_err());
        assert!(Row::split_qualified(".column").is_err());
        assert!(Row::split_qualified("Table.").is_err());
    }

    #[test]
    fn test_iteration_is_sorted() {
        let row = Row::new().with("B.b", "2").with("A.a", "1");
        let names: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["A.a", "B.b"]);
    }
}
