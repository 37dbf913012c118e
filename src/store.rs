//! Process-wide state: the current inventory table and the uploaded files.
use crate::error::LookupError;
use crate::query::search;
use crate::query::QueryResult;
use crate::spreadsheet::FormatError;
use crate::table::NormalizedTable;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use tracing::info;

/// The most recently loaded table, shared by one writer and many readers.
///
/// Loads swap in a whole new table; searches run on the table that was
/// current when they started and never observe a partial replacement.
#[derive(Debug, Default)]
pub struct TableStore {
    current: RwLock<Option<Arc<NormalizedTable>>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current table.
    pub fn replace(&self, table: NormalizedTable) {
        let table = Arc::new(table);
        // The guarded value is a pointer swap, a poisoned lock holds no torn state
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(table);
    }

    /// The current table, `None` before the first load.
    pub fn current(&self) -> Option<Arc<NormalizedTable>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Searches the current table.
    ///
    /// # Errors
    ///
    /// [`LookupError::NotLoaded`] when no table has been loaded yet.
    pub fn search(&self, query: &str) -> Result<QueryResult, LookupError> {
        let table = self.current().ok_or(LookupError::NotLoaded)?;
        Ok(search(&table, query))
    }
}

/// Directory keeping uploaded workbooks, one file per upload name.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Opens the store, creating `dir` when missing.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, LookupError> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under the final component of `file_name`, replacing any
    /// earlier upload of the same name.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, LookupError> {
        let path = self.dir.join(sanitize_file_name(file_name)?);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Saved upload");
        Ok(path)
    }
}

/// Keeps only the last path component so uploads cannot escape the store.
fn sanitize_file_name(file_name: &str) -> Result<String, FormatError> {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(FormatError::InvalidFileName(file_name.to_owned()));
    }
    Ok(name.to_owned())
}
