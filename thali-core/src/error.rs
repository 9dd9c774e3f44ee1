use thiserror::Error;

/// Failure talking to the dish catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog query `{operation}` failed: {message}")]
    Query {
        operation: &'static str,
        message: String,
    },

    #[error("Stored dish is malformed: {0}")]
    Corrupt(String),
}

impl CatalogError {
    pub fn query(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Query {
            operation,
            message: err.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("No usable ingredients after trimming")]
    InvalidInput,

    #[error(transparent)]
    StoreUnavailable(#[from] CatalogError),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read CSV: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV record at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}
