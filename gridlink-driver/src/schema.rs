use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::DriverError;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// The data type of a column.
///
/// Grid backed tables carry no type information, so every column
/// is a string column.
pub enum ColumnType {
    #[default]
    String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
/// A single named column within a [Schema].
pub struct Column {
    /// The unique name of the column.
    pub name: String,
    /// The zero-based position of the column in the table.
    pub ordinal_position: usize,
    #[serde(rename = "type", default)]
    /// The data type of the column values.
    pub column_type: ColumnType,
}

impl Column {
    /// Creates a new string column.
    pub fn new(name: impl Into<String>, ordinal_position: usize) -> Self {
        Self {
            name: name.into(),
            ordinal_position,
            column_type: ColumnType::String,
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
/// The ordered set of columns that make up the primary key of a table.
///
/// The order is the order in which the columns were declared, which
/// is not necessarily the order of the columns themselves.
pub struct PrimaryKey {
    pub column_names: Vec<String>,
}

impl PrimaryKey {
    pub fn new<I, S>(column_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column_names: column_names.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    /// Returns if the named column is part of the key.
    pub fn contains(&self, column: &str) -> bool {
        self.column_names.iter().any(|name| name == column)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.column_names.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.column_names.len()
    }

    /// Appends a column to the key unless it is already a member.
    pub fn push(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.contains(&column) {
            self.column_names.push(column);
        }
    }
}

impl Display for PrimaryKey {
    /// The composite key string used to group the key values of a row.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_names.join(","))
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
/// The structure of a table: its name, ordered columns and primary key.
pub struct Schema {
    /// The name of the table.
    pub name: String,
    /// The columns in ordinal order.
    pub columns: Vec<Column>,
    #[serde(default)]
    /// The primary key of the table, possibly empty.
    pub primary_key: PrimaryKey,
}

impl Schema {
    /// Returns the column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns an iterator over the column names in ordinal order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Checks the invariants of the schema.
    ///
    /// - Column names must be unique.
    /// - Ordinal positions must match the position of the column.
    /// - Every primary key column must be one of the schema columns.
    /// - Primary key column names must not be empty, `()` is not a key
    ///   annotation.
    pub fn validate(&self) -> Result<(), DriverError> {
        for (position, column) in self.columns.iter().enumerate() {
            if self.columns[..position]
                .iter()
                .any(|other| other.name == column.name)
            {
                return Err(DriverError::DuplicateColumn(column.name.clone()));
            }

            if column.ordinal_position != position {
                return Err(DriverError::InvalidConfiguration(format!(
                    "column {:?} has ordinal position {} but is at position {position}",
                    column.name, column.ordinal_position,
                )));
            }
        }

        if self.primary_key.column_names.iter().any(String::is_empty) {
            return Err(DriverError::InvalidConfiguration(format!(
                "primary key of {:?} contains an empty column name",
                self.name,
            )));
        }

        if let Some(missing) = self
            .primary_key
            .column_names
            .iter()
            .find(|name| self.column(name).is_none())
        {
            return Err(DriverError::InvalidConfiguration(format!(
                "primary key column {missing:?} is not a column of {:?}",
                self.name,
            )));
        }

        Ok(())
    }
}
