use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file is missing or unreadable.
    #[error("cannot read {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent or a value has the wrong type.
    #[error("schema error in {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// The current selection matches no rows. Informational only: charts
    /// render empty instead of failing.
    #[error("the current selection matches no rows")]
    EmptySelection,
}

impl DataError {
    pub(crate) fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DataError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Access {
            path: path.into(),
            source,
        }
    }
}

pub type DataResult<T> = Result<T, DataError>;
