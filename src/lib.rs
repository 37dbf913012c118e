//! # Hat Lookup
//!
//! Loads a hat inventory workbook and answers "where are this client's hats"
//! questions against it.
//!
//! The inventory lives on one worksheet of an `.xlsx` file. Rows are grouped
//! into containers by marker rows: a cell reading `CAJA` in the marker column
//! announces that the cell directly below names the container for every row
//! until the next marker. Each data row records a client, a client identifier
//! and a transaction type.
//!
//! ## Flow
//!
//! - [`HatLookup::upload`] stores the uploaded bytes under the upload directory,
//!   reads the inventory sheet back from disk and swaps it in as the current
//!   table. A failed load keeps the previous table.
//! - [`HatLookup::search`] matches a client name or identifier substring and
//!   counts the matching records per container and transaction type.
//!
//! ## Modules
//!
//! - [`spreadsheet`]: a minimal `.xlsx` reader producing typed cell grids
//! - [`loader`]: container forward fill and record normalization
//! - [`query`]: client search and result rendering
//! - [`store`]: the shared current table and the upload directory
mod error;
mod helpers;

pub mod loader;
pub mod options;
pub mod query;
pub mod service;
pub mod spreadsheet;
pub mod store;
pub mod table;

pub use error::LookupError;
pub use error::ResultMessage;
pub use options::LookupOptions;
pub use query::search;
pub use query::Found;
pub use query::Group;
pub use query::QueryResult;
pub use service::HatLookup;
pub use service::LoadSummary;
pub use table::NormalizedTable;
pub use table::Record;
