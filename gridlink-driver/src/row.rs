use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// A single cell value of a [crate::ColumnType::String] column.
pub struct ColumnValue(String);

impl ColumnValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for ColumnValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The primary key values of a row, keyed by the composite key string
/// of the [crate::PrimaryKey] they belong to.
pub type GroupByKey = BTreeMap<String, Vec<ColumnValue>>;

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
/// A single row of a table.
pub struct Row {
    /// The value of every column in the table, keyed by column name.
    pub values: BTreeMap<String, ColumnValue>,
    #[serde(default)]
    /// The values of the primary key columns in key order.
    ///
    /// Holds at most one entry as a table has a single primary key.
    pub group_by_key: GroupByKey,
}

impl Row {
    /// Creates a row from a set of `(column, value)` pairs with no
    /// primary key grouping.
    pub fn from_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ColumnValue>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            group_by_key: GroupByKey::new(),
        }
    }

    /// Returns the value of the named column.
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.values.get(column)
    }
}
