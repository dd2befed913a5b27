use thiserror::Error;

/// Failures raised by the item model, sheet naming, and persistence.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("not a number: `{0}`")]
    ParseNumber(String),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("syntax: load [a-zA-Z0-9_-]+")]
    InvalidSheetName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Rejected date specs. At the shell these are warnings: the date keeps its
/// prior value and the session continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("living in the future...?")]
    FutureDate,
    #[error("too far back into history...")]
    TooFarBack,
    #[error("incorrect date format, should be YYYY-MM-DD")]
    Format,
}

pub type Result<T> = std::result::Result<T, SheetError>;
