use crate::spreadsheet::cell::Cell;

static MISSING: Cell = Cell::Missing;

/// A worksheet read without any header interpretation.
///
/// Row 0 is worksheet row 1 and column 0 is column `A`. Rows that hold no
/// cells between data rows are kept (empty); nothing is stored past the last
/// row holding a value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSheet {
    /// Sheet name as listed in the workbook
    pub name: String,
    rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            rows: Vec::new(),
        }
    }

    /// Builds a sheet from literal rows, mostly for tests and in-memory callers.
    pub fn from_rows(name: &str, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_owned(),
            rows,
        }
    }

    /// Number of rows, including interior empty rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Places a cell, growing the row grid as needed. Missing cells are ignored.
    pub(crate) fn push(&mut self, row: usize, col: usize, cell: Cell) {
        if cell.is_missing() {
            return;
        }
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let record = &mut self.rows[row];
        if record.len() <= col {
            record.resize(col + 1, Cell::Missing);
        }
        record[col] = cell;
    }

    /// Cell at `(row, col)`, [`Cell::Missing`] outside the stored data.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|record| record.get(col))
            .unwrap_or(&MISSING)
    }

    /// Cells of one row; shorter rows are not padded.
    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }
}
