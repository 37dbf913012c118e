use crate::spreadsheet::Cell;

static MISSING: Cell = Cell::Missing;

/// One data row of the inventory sheet after normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Row index in the raw sheet (0-based)
    pub row: usize,
    /// Trimmed, uppercased client name
    pub client: Option<String>,
    /// Trimmed, uppercased client identifier
    pub id: Option<String>,
    /// Derived container label
    pub container: String,
    /// Cells aligned with [`NormalizedTable::headers`]
    pub values: Vec<Cell>,
}

/// The queryable form of the inventory sheet.
///
/// Records keep the order of the sheet, duplicates included. The derived
/// container column is a regular column of the table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedTable {
    pub(crate) headers: Vec<Cell>,
    pub(crate) records: Vec<Record>,
    pub(crate) type_column: Option<usize>,
}

impl NormalizedTable {
    /// Column names, trimmed when textual.
    pub fn headers(&self) -> &[Cell] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the first column whose name is exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        position(&self.headers, name)
    }

    /// Cell of `record` in column `name`, [`Cell::Missing`] for unknown columns.
    pub fn value<'a>(&self, record: &'a Record, name: &str) -> &'a Cell {
        self.column_index(name)
            .and_then(|index| record.values.get(index))
            .unwrap_or(&MISSING)
    }

    /// Transaction type of `record`, the empty string when absent.
    pub fn transaction_type(&self, record: &Record) -> String {
        self.type_column
            .and_then(|index| record.values.get(index))
            .and_then(Cell::to_text)
            .unwrap_or_default()
    }

    /// Number of distinct container labels among the records.
    pub fn container_count(&self) -> usize {
        let mut containers: Vec<&str> = self.records.iter().map(|record| record.container.as_str()).collect();
        containers.sort_unstable();
        containers.dedup();
        containers.len()
    }
}

pub(crate) fn position(headers: &[Cell], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| matches!(header, Cell::Text(text) if text == name))
}
