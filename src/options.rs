use std::env;
use std::path::PathBuf;

/// Environment variable overriding [`LookupOptions::upload_dir`]
pub const ENV_UPLOAD_DIR: &str = "HAT_LOOKUP_UPLOAD_DIR";
/// Environment variable overriding [`LookupOptions::sheet_name`]
pub const ENV_SHEET_NAME: &str = "HAT_LOOKUP_SHEET";

/// Layout of the inventory workbook and where uploads are kept.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupOptions {
    /// Worksheet holding the inventory.
    pub sheet_name: String,

    /// Row (0-based) holding column names; data starts on the next row.
    pub header_row: usize,

    /// Column (0-based) scanned for container marker rows.
    pub marker_column: usize,

    /// Marker text, compared after trimming and uppercasing.
    pub marker_text: String,

    /// Container label for rows that precede every marker.
    pub unknown_container: String,

    /// Required column with client names.
    pub client_column: String,

    /// Required column with client identifiers.
    pub id_column: String,

    /// Transaction type column used for grouping; optional in the sheet.
    pub type_column: String,

    /// Name of the derived container column.
    pub container_column: String,

    /// Directory receiving uploaded workbooks.
    pub upload_dir: PathBuf,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            sheet_name: "SOMBREROS".to_owned(),
            header_row: 2,
            marker_column: 1,
            marker_text: "CAJA".to_owned(),
            unknown_container: "UNKNOWN".to_owned(),
            client_column: "Cliente".to_owned(),
            id_column: "ID".to_owned(),
            type_column: "TX".to_owned(),
            container_column: "Caja".to_owned(),
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

impl LookupOptions {
    /// Defaults, with the upload directory and sheet name taken from the
    /// environment when set to a non-blank value.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(dir) = lookup(ENV_UPLOAD_DIR) {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(sheet_name) = lookup(ENV_SHEET_NAME) {
            self.sheet_name = sheet_name;
        }
        self
    }
}
