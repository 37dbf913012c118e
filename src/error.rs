use thiserror::Error;

/// Main error type for the hat lookup crate.
/// Aggregates errors from the standard library, dependencies and internal modules.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{0}")]
    WithContextError(String),

    /// A search ran before any workbook was loaded
    #[error("No workbook has been loaded yet")]
    NotLoaded,

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet and table errors
    #[error("{0}")]
    FormatError(#[from] crate::spreadsheet::FormatError),
}

impl LookupError {
    /// Returns true when the failure was caused by the uploaded content itself
    /// rather than by the environment (disk, permissions).
    pub fn is_format_error(&self) -> bool {
        match self {
            Self::FormatError(_)
            | Self::ZipError(_)
            | Self::XmlError(_)
            | Self::XmlEncodingError(_)
            | Self::XmlAttributeError(_)
            | Self::XmlHelperError(_)
            | Self::ParseIntError(_) => true,
            _ => false,
        }
    }

    /// Folds content errors (XML syntax, entities, attributes) into
    /// [`FormatError::InvalidWorkbook`](crate::spreadsheet::FormatError::InvalidWorkbook);
    /// other errors pass through unchanged.
    pub fn into_format_error(self) -> Self {
        match self {
            Self::FormatError(_) => self,
            error if error.is_format_error() => {
                crate::spreadsheet::FormatError::InvalidWorkbook(error.to_string()).into()
            }
            error => error,
        }
    }
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, LookupError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| match e {
            // Keep the kinds callers branch on
            LookupError::NotLoaded => e,
            e if e.is_format_error() => e,
            _ => LookupError::WithContextError(format!("{}: {}", message, e)),
        })
    }
}
