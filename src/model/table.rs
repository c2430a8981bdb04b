//! Table types.

use serde::{Deserialize, Serialize};

/// A table of plain-text cells.
///
/// The first row is treated as the header when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows of cell strings.
    pub fn from_cells<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(TableRow::from_cells).collect(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row, if any.
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// Rows after the header.
    pub fn body(&self) -> &[TableRow] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cell texts, already trimmed
    pub cells: Vec<String>,
}

impl TableRow {
    /// Create a row, trimming each cell.
    pub fn from_cells<C>(cells: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|c| {
                    let s: String = c.into();
                    s.trim().to_string()
                })
                .collect(),
        }
    }

    /// Check if every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// A spreadsheet grid with merge information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    /// Rows of cells; rows may be ragged
    pub rows: Vec<Vec<GridCell>>,
}

impl Grid {
    /// Widest row length.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}

/// One spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCell {
    /// The cell's own text
    pub text: String,

    /// Anchor text of the merged range covering this cell, when this cell
    /// is a non-anchor member of one. Counts toward column width only.
    pub merged: Option<String>,
}

impl GridCell {
    /// Create a cell with its own text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            merged: None,
        }
    }

    /// Whether the cell has text of its own.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Text used when measuring column width.
    pub fn width_text(&self) -> &str {
        if self.has_text() {
            self.text.trim()
        } else {
            self.merged.as_deref().map(str::trim).unwrap_or("")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells_trims() {
        let table = Table::from_cells(vec![vec![" A ", "B"], vec!["1", " 2"]]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows[0].cells, vec!["A", "B"]);
        assert_eq!(table.body()[0].cells, vec!["1", "2"]);
    }

    #[test]
    fn test_blank_row() {
        assert!(TableRow::from_cells(["", "  "]).is_blank());
        assert!(!TableRow::from_cells(["", "x"]).is_blank());
        assert!(Table::new().header().is_none());
    }
}
