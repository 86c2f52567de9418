//! Raw grid values and the ranges used to address them.
//!
//! A grid is the wire level shape of a table: rows of untyped cells,
//! with rows allowed to be of differing lengths.

use std::fmt::{Display, Formatter};

use serde_json::Value;

/// A single untyped cell value as returned by a grid service.
pub type Cell = Value;

/// Rows of cells, rows may be shorter than the widest row.
pub type Grid = Vec<Vec<Cell>>;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// An inclusive, zero-based rectangle of cells.
pub struct CellBounds {
    pub first_row: usize,
    pub first_column: usize,
    pub last_row: usize,
    pub last_column: usize,
}

impl CellBounds {
    /// The first `width` cells of a single row.
    ///
    /// `width` must be at least `1`.
    pub fn row(row: usize, width: usize) -> Self {
        debug_assert!(width > 0, "A row range must span at least one cell");
        Self {
            first_row: row,
            first_column: 0,
            last_row: row,
            last_column: width.saturating_sub(1),
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.last_column - self.first_column + 1
    }

    #[inline]
    fn contains(&self, row: usize, column: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_column..=self.last_column).contains(&column)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// A range of cells within a named table (sheet).
///
/// A range without bounds covers the whole table, anchored at the
/// first cell.
pub struct GridRange {
    pub table: String,
    pub bounds: Option<CellBounds>,
}

impl GridRange {
    /// The whole of the named table.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            bounds: None,
        }
    }

    /// The given cells of the named table.
    pub fn bounded(table: impl Into<String>, bounds: CellBounds) -> Self {
        Self {
            table: table.into(),
            bounds: Some(bounds),
        }
    }
}

impl Display for GridRange {
    /// Renders the range in A1 notation, e.g. `'Sheet 1'!A1:C1`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.table.replace('\'', "''"))?;
        if let Some(bounds) = self.bounds {
            write!(
                f,
                "!{}{}:{}{}",
                column_letters(bounds.first_column),
                bounds.first_row + 1,
                column_letters(bounds.last_column),
                bounds.last_row + 1,
            )?;
        }
        Ok(())
    }
}

/// Converts a zero-based column index to its letters (0 = A, 25 = Z, 26 = AA).
pub fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (column % 26) as u8);
        if column < 26 {
            break;
        }
        column = column / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Returns if the cell holds no data.
pub fn is_empty_cell(cell: &Cell) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// A short name of the kind of value a cell holds.
pub fn cell_kind(cell: &Cell) -> &'static str {
    match cell {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders a cell to its string form.
pub fn cell_to_string(cell: &Cell) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Removes trailing empty cells from every row and then any trailing
/// empty rows, the way a spreadsheet service reports a table's values.
pub fn trim(grid: &mut Grid) {
    trim_cells(grid);
    while grid.last().is_some_and(|row| row.is_empty()) {
        grid.pop();
    }
}

/// Removes trailing empty cells from every row, keeping every row.
pub fn trim_cells(grid: &mut Grid) {
    for row in grid.iter_mut() {
        while row.last().is_some_and(is_empty_cell) {
            row.pop();
        }
    }
}

/// Copies the cells covered by `bounds` out of `grid`, anchored at the
/// first cell of the bounds.
pub fn slice(grid: &[Vec<Cell>], bounds: Option<CellBounds>) -> Grid {
    let mut sliced: Grid = match bounds {
        None => grid.to_vec(),
        Some(bounds) => grid
            .iter()
            .skip(bounds.first_row)
            .take(bounds.height())
            .map(|row| {
                row.iter()
                    .skip(bounds.first_column)
                    .take(bounds.width())
                    .cloned()
                    .collect()
            })
            .collect(),
    };
    trim_cells(&mut sliced);
    sliced
}

/// Overwrites the cells of `grid` starting at the first cell of `bounds`
/// with `values`, growing the grid as required.
///
/// Returns `false` without touching the grid if `values` do not fit
/// within the bounds.
pub fn overwrite(grid: &mut Grid, bounds: Option<CellBounds>, values: &[Vec<Cell>]) -> bool {
    let (first_row, first_column) = match bounds {
        None => (0, 0),
        Some(bounds) => {
            let widest = values.iter().map(Vec::len).max().unwrap_or(0);
            if values.len() > bounds.height() || widest > bounds.width() {
                return false;
            }
            (bounds.first_row, bounds.first_column)
        },
    };

    for (row_offset, row_values) in values.iter().enumerate() {
        let row_index = first_row + row_offset;
        if grid.len() <= row_index {
            grid.resize_with(row_index + 1, Vec::new);
        }

        let row = &mut grid[row_index];
        let required = first_column + row_values.len();
        if row.len() < required {
            row.resize(required, Value::String(String::new()));
        }
        for (column_offset, value) in row_values.iter().enumerate() {
            row[first_column + column_offset] = value.clone();
        }
    }

    trim_cells(grid);
    true
}

/// Empties every cell of `grid` covered by `bounds`, or the whole grid.
pub fn clear(grid: &mut Grid, bounds: Option<CellBounds>) {
    match bounds {
        None => grid.clear(),
        Some(bounds) => {
            for (row_index, row) in grid.iter_mut().enumerate() {
                for (column_index, cell) in row.iter_mut().enumerate() {
                    if bounds.contains(row_index, column_index) {
                        *cell = Value::String(String::new());
                    }
                }
            }
        },
    }
    trim_cells(grid);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn grid(value: Value) -> Grid {
        serde_json::from_value(value).unwrap()
    }

    #[rstest::rstest]
    #[case(0, "A")]
    #[case(1, "B")]
    #[case(25, "Z")]
    #[case(26, "AA")]
    #[case(27, "AB")]
    #[case(51, "AZ")]
    #[case(52, "BA")]
    #[case(701, "ZZ")]
    #[case(702, "AAA")]
    fn test_column_letters(#[case] column: usize, #[case] expected: &str) {
        assert_eq!(column_letters(column), expected);
    }

    #[test]
    fn test_range_a1_notation() {
        assert_eq!(GridRange::table("Sheet1").to_string(), "'Sheet1'");
        assert_eq!(
            GridRange::bounded("Sheet1", CellBounds::row(0, 3)).to_string(),
            "'Sheet1'!A1:C1"
        );
        assert_eq!(
            GridRange::bounded("Bob's data", CellBounds::row(4, 28)).to_string(),
            "'Bob''s data'!A5:AB5"
        );
    }

    #[test]
    fn test_trim() {
        let mut values = grid(json!([["a", "", ""], ["", ""], ["b"], [], [""]]));
        trim(&mut values);
        assert_eq!(values, grid(json!([["a"], [], ["b"]])));
    }

    #[test]
    fn test_trim_cells_keeps_rows() {
        let mut values = grid(json!([["a", ""], ["", ""], []]));
        trim_cells(&mut values);
        assert_eq!(values, grid(json!([["a"], [], []])));
    }

    #[test]
    fn test_overwrite_keeps_trailing_empty_rows() {
        let mut values = Grid::new();
        assert!(overwrite(
            &mut values,
            None,
            &grid(json!([["(id)", "name"], ["1", "a"], ["", ""]]))
        ));
        assert_eq!(values, grid(json!([["(id)", "name"], ["1", "a"], []])));
        assert_eq!(slice(&values, None).len(), 3);
    }

    #[test]
    fn test_slice() {
        let values = grid(json!([["a", "b", "c"], ["d", "e"], ["f"]]));
        assert_eq!(slice(&values, None), values);
        assert_eq!(
            slice(&values, Some(CellBounds::row(1, 2))),
            grid(json!([["d", "e"]]))
        );
        assert!(slice(&values, Some(CellBounds::row(8, 2))).is_empty());
    }

    #[test]
    fn test_overwrite_grows_grid() {
        let mut values = grid(json!([["a"]]));
        assert!(overwrite(
            &mut values,
            Some(CellBounds::row(2, 2)),
            &grid(json!([["x", "y"]]))
        ));
        assert_eq!(values, grid(json!([["a"], [], ["x", "y"]])));
    }

    #[test]
    fn test_overwrite_rejects_values_outside_bounds() {
        let mut values = grid(json!([["a"]]));
        assert!(!overwrite(
            &mut values,
            Some(CellBounds::row(0, 1)),
            &grid(json!([["x", "y"]]))
        ));
        assert_eq!(values, grid(json!([["a"]])));
    }

    #[test]
    fn test_clear_bounds_keeps_other_cells() {
        let mut values = grid(json!([["a", "b", "c"], ["d", "e", "f"]]));
        clear(&mut values, Some(CellBounds::row(0, 2)));
        assert_eq!(values, grid(json!([["", "", "c"], ["d", "e", "f"]])));

        clear(&mut values, None);
        assert!(values.is_empty());
    }
}
