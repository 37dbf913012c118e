//! The upload and search facade used by front ends.
use crate::error::LookupError;
use crate::error::ResultMessage;
use crate::loader;
use crate::options::LookupOptions;
use crate::query::QueryResult;
use crate::store::TableStore;
use crate::store::UploadStore;
use std::path::Path;
use std::path::PathBuf;
use tracing::info;
use tracing::warn;

/// Outcome of a successful load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadSummary {
    /// File the table was loaded from
    pub path: PathBuf,
    pub records: usize,
    /// Distinct container labels
    pub containers: usize,
}

/// Keeps uploaded workbooks and answers client searches against the most
/// recently loaded one.
///
/// A load that fails leaves the previous table in place.
#[derive(Debug)]
pub struct HatLookup {
    options: LookupOptions,
    uploads: UploadStore,
    tables: TableStore,
}

impl HatLookup {
    /// Creates the facade, creating the upload directory when missing.
    pub fn new(options: LookupOptions) -> Result<Self, LookupError> {
        let uploads = UploadStore::new(&options.upload_dir)
            .with_prefix(&format!("Create upload directory '{}'", options.upload_dir.display()))?;
        info!(upload_dir = %uploads.dir().display(), sheet = %options.sheet_name, "Upload store ready");
        Ok(Self {
            options,
            uploads,
            tables: TableStore::new(),
        })
    }

    pub fn options(&self) -> &LookupOptions {
        &self.options
    }

    /// Saves an uploaded workbook, then loads it from disk and makes it the
    /// current table.
    pub fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<LoadSummary, LookupError> {
        let path = self
            .uploads
            .save(file_name, bytes)
            .with_prefix(&format!("Save upload '{}'", file_name))?;
        self.load_path(path)
    }

    /// Loads a workbook already on disk and makes it the current table.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadSummary, LookupError> {
        let path = path.as_ref();
        let table = loader::load_path(path, &self.options)
            .inspect_err(|e| warn!(path = %path.display(), error = %e, "Failed to load workbook"))
            .with_prefix(&format!("Load workbook '{}'", path.display()))?;

        let summary = LoadSummary {
            path: path.to_path_buf(),
            records: table.len(),
            containers: table.container_count(),
        };
        self.tables.replace(table);
        info!(
            path = %summary.path.display(),
            records = summary.records,
            containers = summary.containers,
            "Loaded workbook"
        );
        Ok(summary)
    }

    /// Searches the current table for a client name or identifier.
    ///
    /// # Errors
    ///
    /// [`LookupError::NotLoaded`] before the first successful load.
    pub fn search(&self, query: &str) -> Result<QueryResult, LookupError> {
        self.tables.search(query)
    }
}
