//! # Loader
//!
//! Turns the inventory worksheet into a [`NormalizedTable`]: container labels
//! are forward filled from marker rows, the header row is located, client
//! names and identifiers are normalized, and every data row becomes a record
//! tagged with its container.
use crate::error::LookupError;
use crate::options::LookupOptions;
use crate::spreadsheet::Cell;
use crate::spreadsheet::FormatError;
use crate::spreadsheet::RawSheet;
use crate::spreadsheet::XlsxWorkbook;
use crate::table::position;
use crate::table::NormalizedTable;
use crate::table::Record;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use tracing::debug;
use tracing::info;

pub mod container;

pub use container::ContainerMap;

/// Opens a workbook, reads the configured sheet and normalizes it.
///
/// Malformed workbook content (bad zip, XML, entities or cell references)
/// fails with [`FormatError`]; I/O errors pass through.
pub fn load_workbook<RS: Read + Seek>(reader: RS, options: &LookupOptions) -> Result<NormalizedTable, LookupError> {
    let sheet = XlsxWorkbook::open(reader)
        .and_then(|mut workbook| workbook.read_sheet(&options.sheet_name))
        .map_err(LookupError::into_format_error)?;
    Ok(normalize(&sheet, options)?)
}

/// [`load_workbook`] for a file on disk.
pub fn load_path<P: AsRef<Path>>(path: P, options: &LookupOptions) -> Result<NormalizedTable, LookupError> {
    let sheet = XlsxWorkbook::open_path(path)
        .and_then(|mut workbook| workbook.read_sheet(&options.sheet_name))
        .map_err(LookupError::into_format_error)?;
    Ok(normalize(&sheet, options)?)
}

/// Normalizes a raw inventory sheet.
///
/// # Errors
///
/// [`FormatError::MissingHeaderRow`] when the sheet ends before the header row
/// or the header row is empty, [`FormatError::MissingColumn`] when the client
/// or identifier column is not among the headers.
pub fn normalize(sheet: &RawSheet, options: &LookupOptions) -> Result<NormalizedTable, FormatError> {
    let containers = ContainerMap::build(sheet, options.marker_column, &options.marker_text);
    debug!(sheet = %sheet.name, containers = ?containers.containers(), "Container labels");

    let header_row = options.header_row;
    if header_row >= sheet.len() || sheet.row(header_row).iter().all(Cell::is_missing) {
        return Err(FormatError::MissingHeaderRow(header_row));
    }

    let width = (header_row..sheet.len())
        .map(|row| sheet.row(row).len())
        .max()
        .unwrap_or_default();
    let mut headers: Vec<Cell> = (0..width)
        .map(|col| match sheet.get(header_row, col) {
            Cell::Text(name) => Cell::Text(name.trim().to_owned()),
            other => other.clone(),
        })
        .collect();

    let client_column = position(&headers, &options.client_column)
        .ok_or_else(|| FormatError::MissingColumn(options.client_column.to_owned()))?;
    let id_column = position(&headers, &options.id_column)
        .ok_or_else(|| FormatError::MissingColumn(options.id_column.to_owned()))?;
    let type_column = position(&headers, &options.type_column);
    // An existing container column is overwritten by the derived labels
    let container_column = position(&headers, &options.container_column).unwrap_or_else(|| {
        headers.push(Cell::Text(options.container_column.to_owned()));
        headers.len() - 1
    });

    let records: Vec<Record> = (header_row + 1..sheet.len())
        .map(|row| {
            let mut values: Vec<Cell> = (0..headers.len()).map(|col| sheet.get(row, col).clone()).collect();
            let client = values[client_column].normalized();
            let id = values[id_column].normalized();
            let container = containers
                .get(row)
                .unwrap_or(options.unknown_container.as_str())
                .to_owned();
            values[client_column] = client.clone().map(Cell::Text).unwrap_or_default();
            values[id_column] = id.clone().map(Cell::Text).unwrap_or_default();
            values[container_column] = Cell::Text(container.to_owned());
            Record {
                row,
                client,
                id,
                container,
                values,
            }
        })
        .collect();

    let table = NormalizedTable {
        headers,
        records,
        type_column,
    };
    info!(
        sheet = %sheet.name,
        rows = sheet.len(),
        records = table.len(),
        containers = table.container_count(),
        "Normalized inventory sheet"
    );
    Ok(table)
}
