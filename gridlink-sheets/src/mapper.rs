//! Translation between raw grids and schemas/rows.
//!
//! The header row of a table, found at a configured index, names the
//! columns of the table and declares its primary key. Every row below it
//! holds one row of data. Rows above the header row are a free-form
//! preamble which is neither part of the schema nor of the data.

use gridlink_driver::{Column, ColumnValue, DriverError, PrimaryKey, Row, Schema};
use serde_json::Value;
use tracing::debug;

use crate::annotation::{annotate, parse_header_cell};
use crate::grid::{cell_kind, Cell, Grid};

/// Reads a cell which must hold a string.
fn cell_str(cell: &Cell, row: usize, column: usize) -> Result<&str, DriverError> {
    match cell {
        Value::String(text) => Ok(text.as_str()),
        other => Err(DriverError::TypeMismatch {
            row,
            column,
            found: cell_kind(other).to_string(),
        }),
    }
}

/// Derives the schema of table `name` from the header row of `grid`.
///
/// Fails with [DriverError::MissingData] if the grid has no row at
/// `header_row_index`, with [DriverError::TypeMismatch] if a header cell
/// is not a string and with [DriverError::DuplicateColumn] if two header
/// cells resolve to the same column name.
pub fn extract_schema(
    name: &str,
    grid: &[Vec<Cell>],
    header_row_index: usize,
) -> Result<Schema, DriverError> {
    let header = grid.get(header_row_index).ok_or(DriverError::MissingData {
        row: header_row_index,
        available: grid.len(),
    })?;

    let mut columns: Vec<Column> = Vec::with_capacity(header.len());
    let mut primary_key = PrimaryKey::default();
    for (position, cell) in header.iter().enumerate() {
        let text = cell_str(cell, header_row_index, position)?;
        let parsed = parse_header_cell(text);

        if columns.iter().any(|column| column.name == parsed.name) {
            return Err(DriverError::DuplicateColumn(parsed.name.to_string()));
        }

        if parsed.primary_key {
            primary_key.push(parsed.name);
        }
        columns.push(Column::new(parsed.name, position));
    }

    Ok(Schema {
        name: name.to_string(),
        columns,
        primary_key,
    })
}

/// Renders the header row of `schema`.
pub fn serialize_schema(schema: &Schema) -> Vec<Cell> {
    schema
        .columns
        .iter()
        .map(|column| {
            let is_key = schema.primary_key.contains(&column.name);
            Value::String(annotate(&column.name, is_key))
        })
        .collect()
}

/// Reads the rows of table `name` from every row below the header row.
///
/// Missing trailing cells of a row read as empty strings.
pub fn extract_rows(
    name: &str,
    grid: &[Vec<Cell>],
    header_row_index: usize,
) -> Result<Vec<Row>, DriverError> {
    let schema = extract_schema(name, grid, header_row_index)?;
    let composite_key = schema.primary_key.to_string();
    let first_data_row = header_row_index + 1;

    let mut rows = Vec::with_capacity(grid.len().saturating_sub(first_data_row));
    for (offset, cells) in grid.iter().skip(first_data_row).enumerate() {
        let row_index = first_data_row + offset;

        let mut row = Row::default();
        for column in schema.columns.iter() {
            let value = match cells.get(column.ordinal_position) {
                Some(cell) => cell_str(cell, row_index, column.ordinal_position)?,
                None => "",
            };
            let value = ColumnValue::from(value);

            if schema.primary_key.contains(&column.name) {
                row.group_by_key
                    .entry(composite_key.clone())
                    .or_default()
                    .push(value.clone());
            }
            row.values.insert(column.name.clone(), value);
        }
        rows.push(row);
    }

    debug!(table = name, num_rows = rows.len(), "Extracted rows");
    Ok(rows)
}

/// Renders `rows` below the existing preamble and header row of a table.
///
/// `head` is every grid row up to and including the header row and is
/// written back unchanged. Cells are laid out in the column order of
/// `schema`, a row without a value for a column renders an empty cell.
pub fn serialize_rows(schema: &Schema, head: &[Vec<Cell>], rows: &[Row]) -> Grid {
    let mut grid: Grid = Vec::with_capacity(head.len() + rows.len());
    grid.extend(head.iter().cloned());

    for row in rows {
        let cells = schema
            .columns
            .iter()
            .map(|column| {
                let text = row
                    .get(&column.name)
                    .map(|value| value.to_string())
                    .unwrap_or_default();
                Value::String(text)
            })
            .collect();
        grid.push(cells);
    }

    grid
}
