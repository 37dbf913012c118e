//! # Spreadsheet Reading Module
//!
//! Reads Office Open XML workbooks (`.xlsx`, `.xlsm`) into [`RawSheet`] grids of
//! typed [`Cell`] values. Only what the loader needs is parsed: the sheet list,
//! the shared string table and the cell values of one worksheet. Styles and
//! number formats are ignored, so serial dates surface as plain numbers.
use thiserror::Error;

pub(crate) mod cell;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cell::Cell;
pub use sheet::RawSheet;
pub use xlsx::XlsxWorkbook;

/// Problems with the uploaded content: wrong container, missing sheet, or a
/// sheet that does not have the expected header layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("Not a readable xlsx workbook: {0}")]
    InvalidWorkbook(String),

    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    #[error("Missing header row at row {}", .0 + 1)]
    MissingHeaderRow(usize),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid upload file name '{0}'")]
    InvalidFileName(String),
}
